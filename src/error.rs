use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::Error as SqlxError;
use std::collections::HashMap;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum SearchError {
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("missing required setting `{0}`")]
    MissingSetting(&'static str),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("unsupported database locator: {0}")]
    UnsupportedDatabase(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("table_names {0:?} not found in database")]
    UnknownTables(Vec<String>),

    #[error("{0} is not a valid tool, try one of [{1}]")]
    UnknownTool(String, String),

    #[error("invalid arguments for tool `{0}`: {1}")]
    ToolArguments(String, String),

    #[error("model returned no choices")]
    EmptyCompletion,

    #[error("agent stopped after {0} model turns without a final answer")]
    StepLimit(usize),

    #[error("agent returned an empty conversation")]
    EmptyConversation,

    #[error("question must not be empty")]
    EmptyQuestion,

    #[error("interaction queue closed")]
    QueueClosed,

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("OpenAI API error: {0:?}")]
    OpenAiServerError(OpenAiError),
}

impl SearchError {
    /// Status and client-facing body. Internal detail stays in the logs.
    pub fn api_error(self) -> (StatusCode, ApiErrorBody) {
        match self {
            SearchError::OpenAiServerError(api_err) => {
                let body = ApiErrorBody {
                    code: api_err
                        .error
                        .code
                        .clone()
                        .or(api_err.error.kind.clone())
                        .unwrap_or_else(|| "UPSTREAM_ERROR".to_string()),
                    message: api_err.error.message,
                };
                (StatusCode::BAD_GATEWAY, body)
            }
            SearchError::EmptyQuestion => {
                let status = StatusCode::BAD_REQUEST;
                let body = ApiErrorBody {
                    code: "EMPTY_QUESTION".to_string(),
                    message: "Question must not be empty.".to_string(),
                };
                (status, body)
            }
            SearchError::StepLimit(_) => {
                let status = StatusCode::UNPROCESSABLE_ENTITY;
                let body = ApiErrorBody {
                    code: "AGENT_STEP_LIMIT".to_string(),
                    message: "The agent could not reach an answer.".to_string(),
                };
                (status, body)
            }
            SearchError::Reqwest(_)
            | SearchError::UrlParse(_)
            | SearchError::Json(_)
            | SearchError::EmptyCompletion => {
                let status = StatusCode::BAD_GATEWAY;
                let body = ApiErrorBody {
                    code: "BAD_GATEWAY".to_string(),
                    message: "Upstream model service is unavailable.".to_string(),
                };
                (status, body)
            }
            SearchError::UpstreamStatus(code) => {
                let (err_code, msg) = match code {
                    StatusCode::TOO_MANY_REQUESTS => {
                        ("RATE_LIMIT", "Upstream rate limit exceeded.")
                    }
                    StatusCode::UNAUTHORIZED => ("UNAUTHORIZED", "Upstream authentication failed."),
                    StatusCode::FORBIDDEN => ("FORBIDDEN", "Upstream permission denied."),
                    StatusCode::NOT_FOUND => ("NOT_FOUND", "Upstream resource not found."),
                    _ => ("UPSTREAM_ERROR", "An upstream error occurred."),
                };
                (
                    StatusCode::BAD_GATEWAY,
                    ApiErrorBody {
                        code: err_code.to_string(),
                        message: msg.to_string(),
                    },
                )
            }
            SearchError::Config(_)
            | SearchError::MissingSetting(_)
            | SearchError::UnsupportedDatabase(_)
            | SearchError::Io(_)
            | SearchError::DatabaseError(_)
            | SearchError::UnknownTables(_)
            | SearchError::UnknownTool(..)
            | SearchError::ToolArguments(..)
            | SearchError::EmptyConversation
            | SearchError::QueueClosed => {
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let body = ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                };
                (status, body)
            }
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = self.api_error();
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// Error envelope returned by OpenAI-compatible chat endpoints.
#[derive(Deserialize, Debug)]
pub struct OpenAiError {
    pub error: OpenAiErrorBody,
}

#[derive(Deserialize, Debug)]
pub struct OpenAiErrorBody {
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}
