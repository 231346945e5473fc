//! Validated completion envelope

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A chat completion object that passed [`validate`](super::validation::validate).
///
/// The JSON is kept as produced by the CLI: fields beyond the required ones
/// are preserved and re-emitted unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionEnvelope {
    value: Value,
}

impl CompletionEnvelope {
    pub(crate) fn from_validated(value: Value) -> Self {
        Self { value }
    }

    pub fn id(&self) -> Option<&str> {
        self.value.get("id").and_then(Value::as_str)
    }

    pub fn model(&self) -> Option<&str> {
        self.value.get("model").and_then(Value::as_str)
    }

    /// Assistant answer of the first choice, when it is a string.
    pub fn content(&self) -> Option<&str> {
        self.value
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}
