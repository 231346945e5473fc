//! Application-level configuration.
//!
//! - [`CompletionParams`]: correction loop control (attempt ceiling)

pub mod completion_params;

pub use completion_params::{CompletionParams, DEFAULT_MAX_ATTEMPTS};
