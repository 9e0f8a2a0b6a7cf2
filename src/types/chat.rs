use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chat roles understood by OpenAI-compatible endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Tool calls requested by an assistant turn; empty for every other message.
    pub fn requested_tools(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: FunctionCall,
}

/// `arguments` is a JSON document encoded as a string, as sent by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolSchema {
    pub fn function(name: &str, description: &str, parameters: Value) -> Self {
        Self {
            kind: function_kind(),
            function: FunctionSchema {
                name: name.to_string(),
                description: description.to_string(),
                parameters,
            },
        }
    }
}

fn function_kind() -> String {
    "function".to_string()
}

fn no_tools(tools: &&[ToolSchema]) -> bool {
    tools.is_empty()
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "no_tools")]
    pub tools: &'a [ToolSchema],
}

/// Only the first choice is consumed. `message` stays untyped so that
/// replies of unexpected shape still reach the caller.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Value,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn assistant_tool_call_turn_parses() {
        let raw = json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": {"name": "sql_db_list_tables", "arguments": "{}"}
            }]
        });
        let msg: ChatMessage = serde_json::from_value(raw).expect("parse assistant turn");
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.content.is_none());
        assert_eq!(msg.requested_tools()[0].function.name, "sql_db_list_tables");
    }

    #[test]
    fn request_omits_empty_tools_and_unset_limits() {
        let messages = [ChatMessage::user("hi")];
        let body = ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
            temperature: 0.0,
            max_tokens: None,
            tools: &[],
        };
        let value = serde_json::to_value(&body).expect("serialize");
        assert!(value.get("tools").is_none());
        assert!(value.get("max_tokens").is_none());
        assert_eq!(value["messages"][0], json!({"role": "user", "content": "hi"}));
    }
}
