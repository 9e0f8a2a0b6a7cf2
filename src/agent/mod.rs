//! The query agent: a chat model bound to SQL tools under a standing instruction.
//!
//! Layout:
//! - `prompt.rs`: the system instruction and the query-checker prompt
//! - `tools.rs`: the SQL toolkit exposed to the model
//! - `react.rs`: the tool-calling loop

pub mod prompt;
pub mod react;
pub mod tools;

use crate::error::SearchError;
use crate::types::{AgentReply, ChatMessage, ToolSchema};
use async_trait::async_trait;
use serde_json::Value;

pub use react::SqlAgent;
pub use tools::{Tool, Toolkit};

/// One chat-completion round trip. Returns the raw reply message.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSchema],
    ) -> Result<Value, SearchError>;
}

/// Answers one question. The returned transcript starts with the question
/// and ends with the agent's final reply.
#[async_trait]
pub trait QueryAgent: Send + Sync {
    async fn invoke(&self, question: &str) -> Result<Vec<AgentReply>, SearchError>;
}
