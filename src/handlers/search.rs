use axum::{
    Form, Json,
    extract::State,
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::page::{render_error_page, render_page, render_page_with};
use crate::{SearchError, router::SearchState};

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
}

/// GET / -> the empty search page.
pub async fn index(State(state): State<SearchState>) -> Html<String> {
    Html(render_page(&state.page_title, "", None))
}

/// POST /search -> runs the question and shows the answer under the form.
/// A blank box re-renders the page without asking the agent. A failed run
/// re-renders the form with the error message and the error's status.
pub async fn search(
    State(state): State<SearchState>,
    Form(form): Form<SearchForm>,
) -> Response {
    if form.query.trim().is_empty() {
        return Html(render_page(&state.page_title, &form.query, None)).into_response();
    }

    match state.interaction.execute_query(&form.query).await {
        Ok(answer) => {
            info!(bytes = answer.len(), "answer ready");
            let mut buf = (state.output_buffer)();
            Html(render_page_with(
                &state.page_title,
                &form.query,
                Some(&answer),
                &mut *buf,
            ))
            .into_response()
        }
        Err(e) => {
            warn!(error = %e, "search failed");
            let (status, body) = e.api_error();
            let page = render_error_page(&state.page_title, &form.query, &body.message);
            (status, Html(page)).into_response()
        }
    }
}

/// POST /api/query -> `{"answer": ...}` for a JSON `{"question": ...}`.
pub async fn query_api(
    State(state): State<SearchState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, SearchError> {
    if req.question.trim().is_empty() {
        return Err(SearchError::EmptyQuestion);
    }
    let answer = state.interaction.execute_query(&req.question).await?;
    Ok(Json(QueryResponse { answer }))
}
