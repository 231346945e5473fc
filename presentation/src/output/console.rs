//! Console output formatter
//!
//! Results go to stdout as JSON only, so the bridge can sit in a pipeline.
//! Human-oriented lines (probe report) are colored.

use crate::output::formatter::{OutputFormatter, error_object};
use bridge_domain::{CompletionEnvelope, ErrorCategory};
use colored::Colorize;
use serde_json::Value;

/// Formats completion results for stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleFormatter {
    compact: bool,
}

impl ConsoleFormatter {
    pub fn new(compact: bool) -> Self {
        Self { compact }
    }

    fn render(&self, value: &Value) -> String {
        let rendered = if self.compact {
            serde_json::to_string(value)
        } else {
            serde_json::to_string_pretty(value)
        };
        // Serializing a `Value` cannot fail.
        rendered.unwrap_or_default()
    }

    /// One-line report of the command chosen by `--probe`
    pub fn probe_line(label: &str, command: &str) -> String {
        format!("{} {} {}", "v".green(), label.bold(), command.dimmed())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_completion(&self, envelope: &CompletionEnvelope) -> String {
        self.render(envelope.as_value())
    }

    fn format_error(&self, message: &str, category: ErrorCategory) -> String {
        self.render(&error_object(message, category))
    }
}
