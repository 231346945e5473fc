//! Infrastructure layer for cli-bridge
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the subprocess-backed CLI gateway, the
//! configuration file loader and the JSONL conversation logger.

pub mod cli;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use cli::{
    CommandResolver, InvocationCandidate, InvokeLimits, ProcessCliGateway, ProcessProber,
    ResolveError, ResolvedCommand, default_candidates,
};
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use logging::JsonlConversationLogger;
