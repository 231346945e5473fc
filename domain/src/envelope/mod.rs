//! Completion envelope domain.
//!
//! - [`validation::validate`]: structural check of a raw CLI reply
//! - [`completion::CompletionEnvelope`]: a reply that passed validation

pub mod completion;
pub mod validation;
