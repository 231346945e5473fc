//! Domain error categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable category of a failed completion.
///
/// Every error that escapes the bridge maps to exactly one category, so the
/// caller-facing layer can distinguish "the external tool is unavailable"
/// from "the external tool could not produce a conforming response".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// No invocation candidate passed its probe on this host.
    ToolNotFound,
    /// The resolved command timed out, exited non-zero or could not be spawned.
    ExecutionFailed,
    /// The attempt ceiling was reached without a structurally valid reply.
    FormatValidationExhausted,
    /// The caller cancelled the request.
    Cancelled,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::ToolNotFound => "tool_not_found",
            ErrorCategory::ExecutionFailed => "execution_failed",
            ErrorCategory::FormatValidationExhausted => "format_validation_exhausted",
            ErrorCategory::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
