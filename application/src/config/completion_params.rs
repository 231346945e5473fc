//! Completion parameters: correction loop control.

use serde::{Deserialize, Serialize};

/// Default number of invoke/validate cycles before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Correction loop control parameters.
///
/// Used by [`RunCompletionUseCase`](crate::use_cases::run_completion::RunCompletionUseCase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionParams {
    /// Maximum invoke/validate cycles for one request (attempt ceiling).
    pub max_attempts: usize,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl CompletionParams {
    pub fn with_max_attempts(mut self, max: usize) -> Self {
        self.max_attempts = max;
        self
    }

    /// Attempt ceiling, never below one.
    pub fn attempt_ceiling(&self) -> usize {
        self.max_attempts.max(1)
    }
}
