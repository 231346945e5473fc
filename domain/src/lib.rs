//! Domain layer for cli-bridge
//!
//! This crate contains the pure logic of the bridge: the chat data model,
//! prompt rendering, the response-format instruction and the structural
//! validator for completion envelopes. It performs no I/O.
//!
//! # Core Concepts
//!
//! ## Prompt Envelope
//!
//! A caller's conversation is prefixed with a synthetic format instruction
//! ([`enforce_format`]) and flattened into one text prompt
//! ([`build_prompt`]) that the external CLI tool continues as the assistant.
//!
//! ## Completion Envelope
//!
//! The CLI's raw reply is checked by [`validate`], which collects every
//! structural violation so a single correction turn can list all of them.

pub mod chat;
pub mod core;
pub mod envelope;
pub mod prompt;

// Re-export commonly used types
pub use chat::entities::{ChatMessage, ChatRequest, Role};
pub use core::error::ErrorCategory;
pub use envelope::{
    completion::CompletionEnvelope,
    validation::{ValidationResult, validate},
};
pub use prompt::{
    builder::{ASSISTANT_CUE, build_prompt, role_label},
    envelope::PromptEnvelope,
    format::{
        ANSWER_PLACEHOLDER, COMPLETION_OBJECT, ResponseTemplate, STOP_REASON, USAGE_COUNTERS,
        enforce_format,
    },
};
