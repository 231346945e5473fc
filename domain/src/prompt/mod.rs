//! Prompt domain
//!
//! Rendering of a structured conversation into the single text prompt the
//! external CLI consumes, and the synthetic instruction that pins down the
//! response format.

pub mod builder;
pub mod envelope;
pub mod format;
