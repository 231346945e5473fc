//! Structural validation of raw CLI replies.
//!
//! [`validate`] never stops at the first problem: every violation found is
//! collected, in a fixed order, so that one correction turn can hand the CLI
//! the complete list.
//!
//! | Check | Violation text |
//! |-------|----------------|
//! | JSON parses | `invalid JSON: <parser message>` |
//! | top level is an object | `response must be a JSON object` |
//! | `id` present | `missing required field: id` |
//! | `object` literal | `object must be "chat.completion"` |
//! | `created` present | `missing required field: created` |
//! | `model` present | `missing required field: model` |
//! | `choices` list | `choices must be an array` |
//! | per choice | `choices[i].index must be a number`, `choices[i].message is missing`, ... |
//! | `usage` present | `missing required field: usage` / `usage must be an object` |
//! | usage counters | `usage.<counter> must be a number` |

use crate::envelope::completion::CompletionEnvelope;
use crate::prompt::format::{COMPLETION_OBJECT, USAGE_COUNTERS};
use serde_json::Value;

/// Outcome of validating one raw reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    violations: Vec<String>,
    value: Option<Value>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty() && self.value.is_some()
    }

    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// The validated envelope, or the violations that prevent it.
    pub fn into_envelope(self) -> Result<CompletionEnvelope, Vec<String>> {
        match self.value {
            Some(value) if self.violations.is_empty() => {
                Ok(CompletionEnvelope::from_validated(value))
            }
            _ => Err(self.violations),
        }
    }
}

/// Check `text` against the chat completion envelope contract.
pub fn validate(text: &str) -> ValidationResult {
    let value: Value = match serde_json::from_str(text.trim()) {
        Ok(v) => v,
        Err(e) => {
            return ValidationResult {
                violations: vec![format!("invalid JSON: {}", e)],
                value: None,
            };
        }
    };

    if !value.is_object() {
        return ValidationResult {
            violations: vec!["response must be a JSON object".to_string()],
            value: None,
        };
    }

    let mut violations = Vec::new();

    require_present(&value, "id", &mut violations);
    if value.get("object").and_then(Value::as_str) != Some(COMPLETION_OBJECT) {
        violations.push(format!("object must be \"{}\"", COMPLETION_OBJECT));
    }
    require_present(&value, "created", &mut violations);
    require_present(&value, "model", &mut violations);

    match value.get("choices").and_then(Value::as_array) {
        None => violations.push("choices must be an array".to_string()),
        Some(choices) => {
            for (i, choice) in choices.iter().enumerate() {
                check_choice(i, choice, &mut violations);
            }
        }
    }

    match value.get("usage") {
        Some(usage) if usage.is_object() => {
            for counter in USAGE_COUNTERS {
                if !usage.get(counter).is_some_and(Value::is_number) {
                    violations.push(format!("usage.{} must be a number", counter));
                }
            }
        }
        Some(usage) if !usage.is_null() => violations.push("usage must be an object".to_string()),
        _ => violations.push("missing required field: usage".to_string()),
    }

    ValidationResult {
        violations,
        value: Some(value),
    }
}

fn check_choice(i: usize, choice: &Value, violations: &mut Vec<String>) {
    if !choice.get("index").is_some_and(Value::is_number) {
        violations.push(format!("choices[{}].index must be a number", i));
    }

    match choice.get("message") {
        Some(message) if !message.is_null() => {
            if !is_present(message, "role") {
                violations.push(format!("choices[{}].message.role is missing", i));
            }
            // Explicit null content is allowed, an absent key is not.
            if message.get("content").is_none() {
                violations.push(format!("choices[{}].message.content is missing", i));
            }
        }
        _ => violations.push(format!("choices[{}].message is missing", i)),
    }

    if !is_present(choice, "finish_reason") {
        violations.push(format!("choices[{}].finish_reason is missing", i));
    }
}

fn is_present(value: &Value, key: &str) -> bool {
    value.get(key).is_some_and(|v| !v.is_null())
}

fn require_present(value: &Value, key: &str, violations: &mut Vec<String>) {
    if !is_present(value, key) {
        violations.push(format!("missing required field: {}", key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn conforming() -> Value {
        json!({
            "id": "chatcmpl-abc",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "sonnet",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hello!"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        })
    }

    #[test]
    fn test_conforming_reply_is_valid() {
        let result = validate(&conforming().to_string());
        assert!(result.is_valid());
        assert!(result.violations().is_empty());
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let text = format!("\n  {}  \n", conforming());
        assert!(validate(&text).is_valid());
    }

    #[test]
    fn test_invalid_json_has_single_violation() {
        let result = validate("not json");
        assert!(!result.is_valid());
        assert_eq!(result.violations().len(), 1);
        assert!(result.violations()[0].starts_with("invalid JSON: "));
    }

    #[test]
    fn test_prose_around_json_is_invalid() {
        let text = format!("Here you go:\n{}", conforming());
        let result = validate(&text);
        assert!(result.violations()[0].starts_with("invalid JSON: "));
    }

    #[test]
    fn test_non_object_is_rejected() {
        let result = validate("[1, 2, 3]");
        assert_eq!(result.violations(), ["response must be a JSON object"]);
    }

    #[test]
    fn test_two_unrelated_missing_fields_reported_exactly() {
        let mut value = conforming();
        value.as_object_mut().unwrap().remove("id");
        value["usage"].as_object_mut().unwrap().remove("total_tokens");

        let result = validate(&value.to_string());
        assert_eq!(
            result.violations(),
            [
                "missing required field: id",
                "usage.total_tokens must be a number",
            ]
        );
    }

    #[test]
    fn test_violation_order_is_stable() {
        let value = json!({
            "object": "text_completion",
            "choices": [{"message": {}}],
        });
        let first = validate(&value.to_string());
        let second = validate(&value.to_string());
        assert_eq!(first, second);
        assert_eq!(
            first.violations(),
            [
                "missing required field: id",
                "object must be \"chat.completion\"",
                "missing required field: created",
                "missing required field: model",
                "choices[0].index must be a number",
                "choices[0].message.role is missing",
                "choices[0].message.content is missing",
                "choices[0].finish_reason is missing",
                "missing required field: usage",
            ]
        );
    }

    #[test]
    fn test_every_choice_is_checked() {
        let mut value = conforming();
        value["choices"]
            .as_array_mut()
            .unwrap()
            .push(json!({"index": "1", "finish_reason": "stop"}));

        let result = validate(&value.to_string());
        assert_eq!(
            result.violations(),
            [
                "choices[1].index must be a number",
                "choices[1].message is missing",
            ]
        );
    }

    #[test]
    fn test_choices_must_be_an_array() {
        let mut value = conforming();
        value["choices"] = json!({"index": 0});
        assert_eq!(validate(&value.to_string()).violations(), ["choices must be an array"]);
    }

    #[test]
    fn test_empty_choices_is_accepted() {
        let mut value = conforming();
        value["choices"] = json!([]);
        let result = validate(&value.to_string());
        assert!(result.is_valid(), "{:?}", result.violations());
    }

    #[test]
    fn test_null_content_is_accepted() {
        let mut value = conforming();
        value["choices"][0]["message"]["content"] = Value::Null;
        assert!(validate(&value.to_string()).is_valid());
    }

    #[test]
    fn test_null_id_counts_as_missing() {
        let mut value = conforming();
        value["id"] = Value::Null;
        assert_eq!(
            validate(&value.to_string()).violations(),
            ["missing required field: id"]
        );
    }

    #[test]
    fn test_usage_counters_must_be_numeric() {
        let mut value = conforming();
        value["usage"] = json!({"prompt_tokens": "10", "completion_tokens": 3});
        assert_eq!(
            validate(&value.to_string()).violations(),
            [
                "usage.prompt_tokens must be a number",
                "usage.total_tokens must be a number",
            ]
        );

        value["usage"] = json!(42);
        assert_eq!(validate(&value.to_string()).violations(), ["usage must be an object"]);
    }

    #[test]
    fn test_into_envelope() {
        let envelope = validate(&conforming().to_string()).into_envelope().unwrap();
        assert_eq!(envelope.as_value(), &conforming());

        let violations = validate("{}").into_envelope().unwrap_err();
        assert!(violations.contains(&"missing required field: id".to_string()));
    }
}
