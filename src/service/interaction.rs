use crate::agent::QueryAgent;
use crate::error::SearchError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info};

/// Runs one question through the agent and returns the text to display.
///
/// Overlapping interactions queue: at most `max_in_flight` agent runs are
/// active, later callers wait for a permit in arrival order.
pub struct InteractionLoop {
    agent: Arc<dyn QueryAgent>,
    in_flight: Semaphore,
}

impl InteractionLoop {
    pub fn new(agent: Arc<dyn QueryAgent>, max_in_flight: usize) -> Self {
        Self {
            agent,
            in_flight: Semaphore::new(max_in_flight.max(1)),
        }
    }

    pub async fn execute_query(&self, message: &str) -> Result<String, SearchError> {
        let _permit = self
            .in_flight
            .acquire()
            .await
            .map_err(|_| SearchError::QueueClosed)?;

        info!(bytes = message.len(), "running agent");
        let transcript = self.agent.invoke(message).await?;
        for (i, reply) in transcript.iter().enumerate() {
            debug!(index = i, message = ?reply, "transcript");
        }

        let last = transcript.last().ok_or(SearchError::EmptyConversation)?;
        Ok(last.display_text())
    }
}
