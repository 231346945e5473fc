//! Output formatter trait

use bridge_domain::{CompletionEnvelope, ErrorCategory};
use serde_json::{Value, json};

/// Trait for rendering the outcome of one completion request
pub trait OutputFormatter {
    /// Format a successful completion envelope
    fn format_completion(&self, envelope: &CompletionEnvelope) -> String;

    /// Format a failure as an error object
    fn format_error(&self, message: &str, category: ErrorCategory) -> String;
}

/// Caller-facing error object: `{"error": {"message": ..., "type": ...}}`
pub fn error_object(message: &str, category: ErrorCategory) -> Value {
    json!({
        "error": {
            "message": message,
            "type": category.as_str(),
        }
    })
}
