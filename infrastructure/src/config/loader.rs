//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// Prefix of environment overrides (`BRIDGE_CLI__EXECUTABLE=...`)
pub const ENV_PREFIX: &str = "BRIDGE_";

const PROJECT_FILES: [&str; 2] = ["cli-bridge.toml", ".cli-bridge.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. `BRIDGE_` environment variables, `__` separating sections
    /// 3. Project root: `./cli-bridge.toml` or `./.cli-bridge.toml`
    /// 4. Global: `<config_dir>/cli-bridge/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::load_with_env(config_path, ENV_PREFIX)
    }

    /// [`load`](Self::load) with a custom environment prefix.
    pub fn load_with_env(
        config_path: Option<&PathBuf>,
        env_prefix: &str,
    ) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        figment = figment.merge(Env::prefixed(env_prefix).split("__"));

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("cli-bridge").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        eprintln!("Configuration sources (in priority order):");

        if let Some(path) = config_path {
            let found = if path.exists() { "FOUND" } else { "     " };
            eprintln!("  [{}] Explicit: {}", found, path.display());
        }

        eprintln!("  [     ] Env:     {}*", ENV_PREFIX);

        if let Some(path) = Self::project_config_path() {
            eprintln!("  [FOUND] Project: {}", path.display());
        } else {
            eprintln!("  [     ] Project: ./cli-bridge.toml or ./.cli-bridge.toml");
        }

        if let Some(path) = Self::global_config_path() {
            let found = if path.exists() { "FOUND" } else { "     " };
            eprintln!("  [{}] Global:  {}", found, path.display());
        }

        eprintln!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.cli.executable, "claude");
        assert_eq!(config.completion.max_attempts, 3);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("cli-bridge"));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[cli]\nmarker = \"Custom CLI\"\ninvoke_timeout_secs = 90\n\n[completion]\nmax_attempts = 2"
        )
        .unwrap();

        let path = file.path().to_path_buf();
        let config = ConfigLoader::load_with_env(Some(&path), "BRIDGE_TEST_EXPLICIT_").unwrap();

        assert_eq!(config.cli.marker, "Custom CLI");
        assert_eq!(config.cli.invoke_timeout_secs, 90);
        assert_eq!(config.completion.max_attempts, 2);
        assert_eq!(config.cli.executable, "claude");
    }

    #[test]
    fn test_env_overrides_nested_keys() {
        // SAFETY: the variable name is unique to this test.
        unsafe {
            std::env::set_var("BRIDGE_TEST_ENV_COMPLETION__MAX_ATTEMPTS", "7");
        }

        let config = ConfigLoader::load_with_env(None, "BRIDGE_TEST_ENV_").unwrap();
        assert_eq!(config.completion.max_attempts, 7);

        unsafe {
            std::env::remove_var("BRIDGE_TEST_ENV_COMPLETION__MAX_ATTEMPTS");
        }
    }

    #[test]
    fn test_explicit_file_beats_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[completion]\nmax_attempts = 4").unwrap();

        unsafe {
            std::env::set_var("BRIDGE_TEST_PRIO_COMPLETION__MAX_ATTEMPTS", "9");
        }

        let path = file.path().to_path_buf();
        let config = ConfigLoader::load_with_env(Some(&path), "BRIDGE_TEST_PRIO_").unwrap();
        assert_eq!(config.completion.max_attempts, 4);

        unsafe {
            std::env::remove_var("BRIDGE_TEST_PRIO_COMPLETION__MAX_ATTEMPTS");
        }
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[completion]\nmax_attempts = \"many\"").unwrap();

        let path = file.path().to_path_buf();
        let result = ConfigLoader::load_with_env(Some(&path), "BRIDGE_TEST_INVALID_");
        assert!(result.is_err());
    }
}
