//! Progress notification port
//!
//! Defines the interface for reporting progress of the correction loop.

use bridge_domain::ErrorCategory;

/// Callback for progress updates during a completion
///
/// Implementations live in the presentation layer. Every method has a no-op
/// default so notifiers only override what they display.
pub trait CompletionProgressNotifier: Send + Sync {
    /// Called before the CLI is invoked for `attempt` (1-based).
    fn on_attempt_start(&self, _attempt: usize, _max_attempts: usize) {}

    /// Called when the reply of `attempt` failed validation.
    fn on_attempt_rejected(&self, _attempt: usize, _violations: &[String]) {}

    /// Called when a valid envelope was produced.
    fn on_complete(&self, _attempts: usize) {}

    /// Called when the completion ends in an error.
    fn on_failed(&self, _category: ErrorCategory) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl CompletionProgressNotifier for NoProgress {}
