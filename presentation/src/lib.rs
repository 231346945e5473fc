//! Presentation layer for cli-bridge
//!
//! This crate contains the CLI definition, request reading, output
//! formatters and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;
pub mod request;

// Re-export commonly used types
pub use cli::commands::{Cli, DEFAULT_MODEL};
pub use output::{ConsoleFormatter, OutputFormatter, error_object};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use request::{RequestError, parse_request, read_request};
