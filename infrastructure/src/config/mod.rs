//! Configuration file loading for cli-bridge
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. `BRIDGE_*` environment variables
//! 3. Project root: `./cli-bridge.toml` or `./.cli-bridge.toml`
//! 4. Global: `<config_dir>/cli-bridge/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileCliConfig, FileCompletionConfig, FileConfig, FileLoggingConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
