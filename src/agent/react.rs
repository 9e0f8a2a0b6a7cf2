//! Tool-calling loop: ask the model, run what it requests, feed the results
//! back, and stop at the first reply that requests nothing.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, warn};

use super::prompt::build_system_prompt;
use super::tools::Toolkit;
use super::{ChatModel, QueryAgent};
use crate::db::SqlDatabase;
use crate::error::SearchError;
use crate::schema::SchemaDescriptor;
use crate::types::{AgentReply, ChatMessage, ToolCall};

pub struct SqlAgent {
    model: Arc<dyn ChatModel>,
    toolkit: Toolkit,
    system_prompt: String,
    max_steps: usize,
}

impl SqlAgent {
    pub fn new(
        model: Arc<dyn ChatModel>,
        toolkit: Toolkit,
        system_prompt: String,
        max_steps: usize,
    ) -> Self {
        Self {
            model,
            toolkit,
            system_prompt,
            max_steps: max_steps.max(1),
        }
    }

    /// Agent over the SQL toolkit for `db`, instructed with `schema`.
    pub fn for_database(
        db: SqlDatabase,
        model: Arc<dyn ChatModel>,
        schema: &SchemaDescriptor,
        top_k: usize,
        max_steps: usize,
    ) -> Self {
        let system_prompt = build_system_prompt(db.dialect(), top_k, schema);
        let toolkit = Toolkit::sql(db, model.clone());
        Self::new(model, toolkit, system_prompt, max_steps)
    }

    /// Tool failures become the tool's answer so the model can correct itself.
    async fn run_tool(&self, call: &ToolCall) -> String {
        match self.toolkit.execute(call).await {
            Ok(output) => {
                debug!(tool = %call.function.name, bytes = output.len(), "tool finished");
                output
            }
            Err(e) => {
                warn!(tool = %call.function.name, error = %e, "tool failed");
                format!("Error: {e}\n Please fix your mistakes.")
            }
        }
    }
}

#[async_trait]
impl QueryAgent for SqlAgent {
    async fn invoke(&self, question: &str) -> Result<Vec<AgentReply>, SearchError> {
        let schemas = self.toolkit.schemas();
        let mut messages = vec![
            ChatMessage::system(self.system_prompt.as_str()),
            ChatMessage::user(question),
        ];
        let mut transcript = vec![AgentReply::Message(ChatMessage::user(question))];

        for step in 0..self.max_steps {
            let reply = AgentReply::from(self.model.complete(&messages, &schemas).await?);
            let Some(msg) = reply.as_message().cloned() else {
                debug!(step, "model replied outside the chat message shape");
                transcript.push(reply);
                return Ok(transcript);
            };

            let calls = msg.requested_tools().to_vec();
            messages.push(msg);
            transcript.push(reply);
            if calls.is_empty() {
                debug!(step, "model produced a final answer");
                return Ok(transcript);
            }

            debug!(step, calls = calls.len(), "model requested tools");
            let outputs = join_all(calls.iter().map(|call| self.run_tool(call))).await;
            for (call, output) in calls.iter().zip(outputs) {
                let result = ChatMessage::tool_result(&call.id, output);
                messages.push(result.clone());
                transcript.push(AgentReply::Message(result));
            }
        }

        warn!(max_steps = self.max_steps, "agent step limit reached");
        Err(SearchError::StepLimit(self.max_steps))
    }
}
