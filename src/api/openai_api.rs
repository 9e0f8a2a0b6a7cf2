use crate::agent::ChatModel;
use crate::config::Config;
use crate::error::{OpenAiError, SearchError};
use crate::types::chat::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ToolSchema};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Client for an OpenAI-compatible `chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiApi {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl OpenAiApi {
    pub fn new(client: reqwest::Client, cfg: &Config) -> Result<Self, SearchError> {
        Ok(Self {
            client,
            endpoint: completions_endpoint(&cfg.openai_base_url)?,
            api_key: cfg.openai_api_key.clone(),
            model: cfg.llm_model.clone(),
            temperature: cfg.llm_temperature,
            max_tokens: cfg.llm_max_tokens,
        })
    }

    /// Shared HTTP client. No timeout unless one is configured.
    pub fn http_client(cfg: &Config) -> Result<reqwest::Client, SearchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("ratecard-search/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10));
        if let Some(secs) = cfg.llm_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(proxy_url) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        Ok(builder.build()?)
    }

    pub async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSchema],
    ) -> Result<Value, SearchError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools,
        };

        let resp = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let bytes = resp.bytes().await?;
            return Err(match serde_json::from_slice::<OpenAiError>(&bytes) {
                Ok(api_err) => {
                    error!(%status, message = %api_err.error.message, "chat completion rejected");
                    SearchError::OpenAiServerError(api_err)
                }
                Err(_) => {
                    error!(%status, "chat completion failed");
                    SearchError::UpstreamStatus(status)
                }
            });
        }

        let completion: ChatCompletionResponse = resp.json().await?;
        debug!(
            model = completion.model.as_deref().unwrap_or(&self.model),
            usage = ?completion.usage,
            "chat completion received"
        );
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or(SearchError::EmptyCompletion)?;
        if let Some(reason) = choice.finish_reason.as_deref() {
            debug!(finish_reason = reason);
        }
        Ok(choice.message)
    }
}

#[async_trait]
impl ChatModel for OpenAiApi {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSchema],
    ) -> Result<Value, SearchError> {
        self.chat_completion(messages, tools).await
    }
}

/// `{base}/chat/completions`, tolerating a base URL with or without a trailing slash.
pub fn completions_endpoint(base: &Url) -> Result<Url, SearchError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join("chat/completions")?)
}
