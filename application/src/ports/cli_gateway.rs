//! CLI Gateway port
//!
//! Defines the interface for running one prompt through the external
//! command-line assistant.

use async_trait::async_trait;
use bridge_domain::ErrorCategory;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that can occur while invoking the external CLI
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("External CLI tool not found (tried: {})", .tried.join(", "))]
    ToolNotFound { tried: Vec<String> },

    #[error("Failed to spawn `{command}`: {message}")]
    SpawnFailed { command: String, message: String },

    #[error("`{command}` timed out after {}s", .timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    #[error("`{command}` exited with {status}: {stderr}")]
    NonZeroExit {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("`{command}` wrote more than {limit} bytes of output")]
    OutputLimitExceeded { command: String, limit: usize },

    #[error("I/O error while talking to `{command}`: {message}")]
    Io { command: String, message: String },

    #[error("Invocation cancelled")]
    Cancelled,
}

impl GatewayError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GatewayError::ToolNotFound { .. } => ErrorCategory::ToolNotFound,
            GatewayError::Cancelled => ErrorCategory::Cancelled,
            GatewayError::SpawnFailed { .. }
            | GatewayError::Timeout { .. }
            | GatewayError::NonZeroExit { .. }
            | GatewayError::OutputLimitExceeded { .. }
            | GatewayError::Io { .. } => ErrorCategory::ExecutionFailed,
        }
    }
}

/// Gateway to the external CLI assistant
///
/// One call is one complete, independent process invocation: the prompt goes
/// in on stdin, the trimmed stdout comes back. Implementations live in the
/// infrastructure layer.
#[async_trait]
pub trait CliGateway: Send + Sync {
    /// Run `prompt` through the CLI with the given model identifier.
    ///
    /// Returns [`GatewayError::Cancelled`] once `cancel` fires.
    async fn invoke(
        &self,
        prompt: &str,
        model: &str,
        cancel: &CancellationToken,
    ) -> Result<String, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let not_found = GatewayError::ToolNotFound {
            tried: vec!["claude".into()],
        };
        assert_eq!(not_found.category(), ErrorCategory::ToolNotFound);
        assert_eq!(GatewayError::Cancelled.category(), ErrorCategory::Cancelled);

        let timeout = GatewayError::Timeout {
            command: "claude".into(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(timeout.category(), ErrorCategory::ExecutionFailed);
        assert_eq!(timeout.to_string(), "`claude` timed out after 30s");
    }

    #[test]
    fn test_tool_not_found_lists_candidates() {
        let error = GatewayError::ToolNotFound {
            tried: vec!["claude".into(), "npx".into()],
        };
        assert_eq!(
            error.to_string(),
            "External CLI tool not found (tried: claude, npx)"
        );
    }
}
