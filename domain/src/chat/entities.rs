//! Chat domain entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self::new(Role::Tool, content)
    }
}

/// A chat completion request as received from the caller.
///
/// Mirrors the subset of the OpenAI Chat Completions request body the bridge
/// understands. Unknown fields are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
        }
    }

    /// Number of messages with the given role.
    pub fn count_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn test_role_names_are_case_sensitive() {
        assert_eq!(serde_json::from_str::<Role>("\"tool\"").unwrap(), Role::Tool);
        assert!(serde_json::from_str::<Role>("\"User\"").is_err());
        assert!(serde_json::from_str::<Role>("\"developer\"").is_err());
    }

    #[test]
    fn test_request_deserializes_openai_shape() {
        let body = r#"{
            "model": "sonnet",
            "messages": [
                {"role": "system", "content": "Be brief."},
                {"role": "user", "content": "Hi"}
            ],
            "temperature": 0.2
        }"#;
        let request: ChatRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.model, "sonnet");
        assert_eq!(
            request.messages,
            vec![ChatMessage::system("Be brief."), ChatMessage::user("Hi")]
        );
    }

    #[test]
    fn test_request_rejects_unknown_role() {
        let body = r#"{"model": "m", "messages": [{"role": "robot", "content": "x"}]}"#;
        assert!(serde_json::from_str::<ChatRequest>(body).is_err());
    }

    #[test]
    fn test_count_role() {
        let request = ChatRequest::new(
            "m",
            vec![
                ChatMessage::user("a"),
                ChatMessage::tool("b"),
                ChatMessage::tool("c"),
            ],
        );
        assert_eq!(request.count_role(Role::Tool), 2);
        assert_eq!(request.count_role(Role::System), 0);
    }
}
