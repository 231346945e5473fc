//! Progress reporting for completion requests
//!
//! Everything here writes to stderr; stdout is reserved for the JSON result.

use bridge_application::ports::progress::CompletionProgressNotifier;
use bridge_domain::ErrorCategory;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Spinner on stderr that follows the attempts of one completion
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_spinner(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.spinner.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }

    fn finish(&self, message: String) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_with_message(message);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionProgressNotifier for ProgressReporter {
    fn on_attempt_start(&self, attempt: usize, max_attempts: usize) {
        let Ok(mut guard) = self.spinner.lock() else {
            return;
        };
        let pb = guard.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        pb.set_prefix(format!("Attempt {}/{}", attempt, max_attempts));
        pb.set_message("waiting for the CLI...");
    }

    fn on_attempt_rejected(&self, attempt: usize, violations: &[String]) {
        self.with_spinner(|pb| {
            pb.println(format!(
                "{} attempt {} rejected ({} problem{})",
                "x".yellow(),
                attempt,
                violations.len(),
                if violations.len() == 1 { "" } else { "s" }
            ));
            pb.set_message("asking for a corrected reply...");
        });
    }

    fn on_complete(&self, attempts: usize) {
        self.finish(format!("{} valid reply after {} attempt(s)", "v".green(), attempts));
    }

    fn on_failed(&self, category: ErrorCategory) {
        self.finish(format!("{} failed: {}", "x".red(), category));
    }
}

/// Simple text-based progress (no spinner)
pub struct SimpleProgress;

impl CompletionProgressNotifier for SimpleProgress {
    fn on_attempt_start(&self, attempt: usize, max_attempts: usize) {
        eprintln!("{} attempt {}/{}", "->".cyan(), attempt, max_attempts);
    }

    fn on_attempt_rejected(&self, _attempt: usize, violations: &[String]) {
        for violation in violations {
            eprintln!("  {} {}", "x".red(), violation);
        }
    }

    fn on_complete(&self, attempts: usize) {
        eprintln!("{} done after {} attempt(s)", "v".green(), attempts);
    }
}
