use super::chat::ChatMessage;
use serde_json::{Map, Value};

/// A message produced by the agent, in whichever shape it arrived.
///
/// Typed chat messages are the normal case. Replies that do not parse as a
/// chat message are kept as raw JSON so their text can still be shown.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentReply {
    /// A JSON object; its `content` key, when present, is the text.
    Mapping(Map<String, Value>),
    Message(ChatMessage),
    Text(String),
    Other(Value),
}

impl AgentReply {
    /// Text to display for this reply. Never fails.
    ///
    /// Order: a mapping's `content` value, a message's content, plain text,
    /// then the JSON rendering of whatever else it is.
    pub fn display_text(&self) -> String {
        match self {
            AgentReply::Mapping(map) => match map.get("content") {
                Some(content) => value_text(content),
                None => Value::Object(map.clone()).to_string(),
            },
            AgentReply::Message(msg) => msg.content.clone().unwrap_or_default(),
            AgentReply::Text(text) => text.clone(),
            AgentReply::Other(value) => value.to_string(),
        }
    }

    pub fn as_message(&self) -> Option<&ChatMessage> {
        match self {
            AgentReply::Message(msg) => Some(msg),
            _ => None,
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl From<ChatMessage> for AgentReply {
    fn from(msg: ChatMessage) -> Self {
        AgentReply::Message(msg)
    }
}

/// Classify a raw model reply: chat message first, then the loose shapes.
impl From<Value> for AgentReply {
    fn from(value: Value) -> Self {
        if let Ok(msg) = serde_json::from_value::<ChatMessage>(value.clone()) {
            return AgentReply::Message(msg);
        }
        match value {
            Value::Object(map) => AgentReply::Mapping(map),
            Value::String(text) => AgentReply::Text(text),
            other => AgentReply::Other(other),
        }
    }
}
