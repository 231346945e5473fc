//! Run Completion use case.
//!
//! Turns a [`ChatRequest`] into a structurally valid chat completion by
//! driving the external CLI through a bounded self-correction loop:
//!
//! ```text
//! enforce_format ─▶ render ─▶ invoke ─▶ validate ─┬─ valid ──────────▶ CompletionEnvelope
//!                     ▲                           ├─ invalid, n < max ─┐
//!                     └── with_correction ◀───────┘                    │
//!                                                 └─ invalid, n = max ─▶ FormatExhausted
//! ```
//!
//! Each attempt is a full, independent CLI invocation. Gateway errors
//! (tool not found, timeouts, non-zero exits) are not format problems and
//! are returned immediately without another attempt.

use crate::config::CompletionParams;
use crate::ports::cli_gateway::{CliGateway, GatewayError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationEventKind, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{CompletionProgressNotifier, NoProgress};
use bridge_domain::{
    ChatRequest, CompletionEnvelope, ErrorCategory, PromptEnvelope, ResponseTemplate, Role,
    enforce_format, validate,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during a completion.
#[derive(Error, Debug)]
pub enum RunCompletionError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(
        "CLI reply failed format validation after {attempts} attempt(s): {}",
        .violations.join("; ")
    )]
    FormatExhausted {
        attempts: usize,
        violations: Vec<String>,
    },
}

impl RunCompletionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RunCompletionError::Gateway(e) => e.category(),
            RunCompletionError::FormatExhausted { .. } => ErrorCategory::FormatValidationExhausted,
        }
    }
}

/// Input for the [`RunCompletionUseCase`].
#[derive(Debug, Clone)]
pub struct RunCompletionInput {
    pub request: ChatRequest,
    pub params: CompletionParams,
}

impl RunCompletionInput {
    pub fn new(request: ChatRequest) -> Self {
        Self {
            request,
            params: CompletionParams::default(),
        }
    }

    pub fn with_params(mut self, params: CompletionParams) -> Self {
        self.params = params;
        self
    }
}

/// Successful result of a completion.
#[derive(Debug, Clone)]
pub struct RunCompletionOutput {
    pub envelope: CompletionEnvelope,
    /// Number of CLI invocations it took (1..=ceiling).
    pub attempts: usize,
}

/// What the loop does after validating one reply.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrectionStep {
    /// The reply is a valid envelope; stop.
    Accepted(CompletionEnvelope),
    /// The reply is invalid and attempts remain; invoke again with `transcript`.
    Retry {
        transcript: PromptEnvelope,
        violations: Vec<String>,
    },
    /// The reply is invalid and the ceiling is reached.
    Exhausted { violations: Vec<String> },
}

/// Decide the next step for the reply of `attempt` (1-based).
pub fn next_step(
    raw_output: &str,
    transcript: &PromptEnvelope,
    template: &ResponseTemplate,
    attempt: usize,
    max_attempts: usize,
) -> CorrectionStep {
    match validate(raw_output).into_envelope() {
        Ok(envelope) => CorrectionStep::Accepted(envelope),
        Err(violations) if attempt >= max_attempts => CorrectionStep::Exhausted { violations },
        Err(violations) => CorrectionStep::Retry {
            transcript: transcript
                .with_correction(raw_output, template.correction_message(&violations)),
            violations,
        },
    }
}

/// Use case for producing one format-conforming chat completion.
pub struct RunCompletionUseCase {
    gateway: Arc<dyn CliGateway>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl Clone for RunCompletionUseCase {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            conversation_logger: self.conversation_logger.clone(),
        }
    }
}

impl RunCompletionUseCase {
    pub fn new(gateway: Arc<dyn CliGateway>) -> Self {
        Self {
            gateway,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub async fn execute(
        &self,
        input: RunCompletionInput,
        cancel: &CancellationToken,
    ) -> Result<RunCompletionOutput, RunCompletionError> {
        self.execute_with_progress(input, &NoProgress, cancel).await
    }

    /// Execute the completion with progress callbacks.
    pub async fn execute_with_progress(
        &self,
        input: RunCompletionInput,
        progress: &dyn CompletionProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<RunCompletionOutput, RunCompletionError> {
        let template = ResponseTemplate::new(
            new_request_id(),
            chrono::Utc::now().timestamp(),
            input.request.model.clone(),
        );

        info!(
            "Starting completion {} (model: {}, {} messages)",
            template.id,
            input.request.model,
            input.request.messages.len()
        );

        let result = self.run(&input, &template, progress, cancel).await;

        match &result {
            Ok(output) => {
                info!(
                    "Completion {} succeeded after {} attempt(s)",
                    template.id, output.attempts
                );
                progress.on_complete(output.attempts);
                self.conversation_logger.log(ConversationEvent::new(
                    ConversationEventKind::CompletionSuccess,
                    serde_json::json!({
                        "request_id": template.id,
                        "attempts": output.attempts,
                    }),
                ));
            }
            Err(e) => {
                warn!("Completion {} failed: {}", template.id, e);
                progress.on_failed(e.category());
                self.conversation_logger.log(ConversationEvent::new(
                    ConversationEventKind::CompletionFailed,
                    serde_json::json!({
                        "request_id": template.id,
                        "category": e.category(),
                        "error": e.to_string(),
                    }),
                ));
            }
        }

        result
    }

    async fn run(
        &self,
        input: &RunCompletionInput,
        template: &ResponseTemplate,
        progress: &dyn CompletionProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<RunCompletionOutput, RunCompletionError> {
        let request = &input.request;
        let max_attempts = input.params.attempt_ceiling();

        let dropped = request.count_role(Role::Tool);
        if dropped > 0 {
            debug!("Omitting {} tool message(s) from the prompt", dropped);
        }

        self.conversation_logger.log(ConversationEvent::new(
            ConversationEventKind::CompletionRequest,
            serde_json::json!({
                "request_id": template.id,
                "model": request.model,
                "messages": request.messages,
                "max_attempts": max_attempts,
            }),
        ));

        let mut transcript = enforce_format(template, &request.messages);
        let mut attempt = 1;

        loop {
            if cancel.is_cancelled() {
                return Err(GatewayError::Cancelled.into());
            }

            progress.on_attempt_start(attempt, max_attempts);
            let prompt = transcript.render();
            debug!(
                "Attempt {}/{}: invoking CLI with {} byte prompt",
                attempt,
                max_attempts,
                prompt.len()
            );

            let raw = self.gateway.invoke(&prompt, &request.model, cancel).await?;

            self.conversation_logger.log(ConversationEvent::new(
                ConversationEventKind::CliOutput,
                serde_json::json!({
                    "request_id": template.id,
                    "attempt": attempt,
                    "prompt_bytes": prompt.len(),
                    "output": raw,
                }),
            ));

            match next_step(&raw, &transcript, template, attempt, max_attempts) {
                CorrectionStep::Accepted(envelope) => {
                    return Ok(RunCompletionOutput {
                        envelope,
                        attempts: attempt,
                    });
                }
                CorrectionStep::Retry {
                    transcript: next,
                    violations,
                } => {
                    self.record_rejection(template, attempt, &violations, progress);
                    transcript = next;
                    attempt += 1;
                }
                CorrectionStep::Exhausted { violations } => {
                    self.record_rejection(template, attempt, &violations, progress);
                    return Err(RunCompletionError::FormatExhausted {
                        attempts: attempt,
                        violations,
                    });
                }
            }
        }
    }

    fn record_rejection(
        &self,
        template: &ResponseTemplate,
        attempt: usize,
        violations: &[String],
        progress: &dyn CompletionProgressNotifier,
    ) {
        warn!(
            "Attempt {} rejected with {} violation(s): {}",
            attempt,
            violations.len(),
            violations.join("; ")
        );
        progress.on_attempt_rejected(attempt, violations);
        self.conversation_logger.log(ConversationEvent::new(
            ConversationEventKind::FormatViolations,
            serde_json::json!({
                "request_id": template.id,
                "attempt": attempt,
                "violations": violations,
            }),
        ));
    }
}

fn new_request_id() -> String {
    format!("chatcmpl-{}", uuid::Uuid::new_v4().simple())
}
