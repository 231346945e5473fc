//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section is optional; missing keys fall back to the defaults below.

use bridge_application::CompletionParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("cli.executable cannot be empty")]
    EmptyExecutable,

    #[error("cli.marker cannot be empty")]
    EmptyMarker,

    #[error("{0} cannot be 0")]
    ZeroValue(&'static str),

    #[error("cli.invoke_args must contain \"{{model}}\" exactly once, found {0}")]
    ModelPlaceholder(usize),
}

/// Raw `[cli]` section: how to find and drive the external tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCliConfig {
    /// Executable name looked up on PATH and through the login shell
    pub executable: String,
    /// Text the probe output must contain
    pub marker: String,
    /// Package fetched by `npx` as the last resort (`None` disables it)
    pub npm_package: Option<String>,
    /// Fixed install locations, probed in order
    pub install_paths: Vec<String>,
    /// Additional fixed locations, probed after `install_paths`
    pub extra_paths: Vec<String>,
    /// Arguments of the version probe
    pub probe_args: Vec<String>,
    /// Arguments of a prompt invocation; `{model}` marks the model
    pub invoke_args: Vec<String>,
    pub probe_timeout_secs: u64,
    pub invoke_timeout_secs: u64,
    pub max_output_bytes: usize,
}

impl Default for FileCliConfig {
    fn default() -> Self {
        Self {
            executable: "claude".to_string(),
            marker: "Claude Code".to_string(),
            npm_package: Some("@anthropic-ai/claude-code".to_string()),
            install_paths: vec![
                "~/.claude/local/claude".to_string(),
                "/usr/local/bin/claude".to_string(),
                "/opt/homebrew/bin/claude".to_string(),
            ],
            extra_paths: Vec::new(),
            probe_args: vec!["--version".to_string()],
            invoke_args: vec!["-p".to_string(), "--model".to_string(), "{model}".to_string()],
            probe_timeout_secs: 5,
            invoke_timeout_secs: 30,
            max_output_bytes: 10 * 1024 * 1024,
        }
    }
}

impl FileCliConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn invoke_timeout(&self) -> Duration {
        Duration::from_secs(self.invoke_timeout_secs)
    }
}

/// Raw `[completion]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCompletionConfig {
    /// Total number of CLI invocations allowed per request
    pub max_attempts: usize,
}

impl Default for FileCompletionConfig {
    fn default() -> Self {
        Self {
            max_attempts: bridge_application::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Raw `[logging]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL conversation log path (disabled when unset)
    pub conversation_log: Option<PathBuf>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub cli: FileCliConfig,
    pub completion: FileCompletionConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.cli.executable.trim().is_empty() {
            return Err(ConfigValidationError::EmptyExecutable);
        }
        if self.cli.marker.is_empty() {
            return Err(ConfigValidationError::EmptyMarker);
        }
        if self.cli.probe_timeout_secs == 0 {
            return Err(ConfigValidationError::ZeroValue("cli.probe_timeout_secs"));
        }
        if self.cli.invoke_timeout_secs == 0 {
            return Err(ConfigValidationError::ZeroValue("cli.invoke_timeout_secs"));
        }
        if self.cli.max_output_bytes == 0 {
            return Err(ConfigValidationError::ZeroValue("cli.max_output_bytes"));
        }
        if self.completion.max_attempts == 0 {
            return Err(ConfigValidationError::ZeroValue("completion.max_attempts"));
        }

        let placeholders = self
            .cli
            .invoke_args
            .iter()
            .filter(|a| a.as_str() == "{model}")
            .count();
        if placeholders != 1 {
            return Err(ConfigValidationError::ModelPlaceholder(placeholders));
        }

        Ok(())
    }

    /// Correction loop parameters
    pub fn completion_params(&self) -> CompletionParams {
        CompletionParams::default().with_max_attempts(self.completion.max_attempts)
    }

    /// Render the effective configuration as TOML (for `--show-config`)
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
