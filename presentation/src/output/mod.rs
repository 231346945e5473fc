//! Output formatting for completion results

pub mod console;
pub mod formatter;

pub use console::ConsoleFormatter;
pub use formatter::{OutputFormatter, error_object};
