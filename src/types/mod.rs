pub mod chat;
pub mod reply;

pub use chat::{ChatMessage, FunctionCall, Role, ToolCall, ToolSchema};
pub use reply::AgentReply;
