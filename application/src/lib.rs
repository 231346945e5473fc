//! Application layer for cli-bridge
//!
//! This crate contains the correction-loop use case, the ports it drives
//! and its configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CompletionParams, DEFAULT_MAX_ATTEMPTS};
pub use ports::{
    cli_gateway::{CliGateway, GatewayError},
    conversation_logger::{
        ConversationEvent, ConversationEventKind, ConversationLogger, NoConversationLogger,
    },
    progress::{CompletionProgressNotifier, NoProgress},
};
pub use use_cases::run_completion::{
    CorrectionStep, RunCompletionError, RunCompletionInput, RunCompletionOutput,
    RunCompletionUseCase, next_step,
};
