//! Configuration management for Mentora
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{MentoraError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Mentora
///
/// This structure holds all configuration needed for the tutor,
/// including provider settings, chat behavior, and storage location.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Provider configuration (model, endpoint)
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Chat behavior configuration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Provider configuration
///
/// Specifies which generative model to call and where. The API key itself
/// is not configured here; it is a user-supplied record in local storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Model identifier sent to the generative-language API
    #[serde(default = "default_model")]
    pub model: String,

    /// Optional API base URL override (useful for tests and local mocks)
    ///
    /// When set, this base is used to build the `generateContent` and
    /// `streamGenerateContent` endpoints, which allows tests to point the
    /// provider at a mock server.
    #[serde(default)]
    pub api_base: Option<String>,
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: None,
        }
    }
}

/// Chat behavior configuration
///
/// Windows and pacing for the conversation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Number of recent messages sent to the model as context
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Number of turns retained in the persisted conversation memory
    #[serde(default = "default_memory_window")]
    pub memory_window: usize,

    /// Per-chunk delay (milliseconds) for the simulated word-by-word reveal
    /// used when the reply is not delivered as a model-driven stream
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,
}

fn default_history_window() -> usize {
    10
}

fn default_memory_window() -> usize {
    20
}

fn default_reveal_delay_ms() -> u64 {
    30
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            memory_window: default_memory_window(),
            reveal_delay_ms: default_reveal_delay_ms(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Data directory override; defaults to the platform data dir
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MentoraError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| MentoraError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(model) = std::env::var("MENTORA_MODEL") {
            self.provider.model = model;
        }

        if let Ok(api_base) = std::env::var("MENTORA_API_BASE") {
            self.provider.api_base = Some(api_base);
        }

        if let Ok(data_dir) = std::env::var("MENTORA_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(data_dir));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(data_dir) = &cli.data_dir {
            self.storage.data_dir = Some(data_dir.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `MentoraError::Config` if any setting is out of range
    pub fn validate(&self) -> Result<()> {
        if self.provider.model.trim().is_empty() {
            return Err(MentoraError::Config("provider.model must not be empty".to_string()).into());
        }

        if self.chat.history_window == 0 {
            return Err(
                MentoraError::Config("chat.history_window must be at least 1".to_string()).into(),
            );
        }

        if self.chat.memory_window == 0 {
            return Err(
                MentoraError::Config("chat.memory_window must be at least 1".to_string()).into(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chat.history_window, 10);
        assert_eq!(config.chat.memory_window, 20);
        assert_eq!(config.provider.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let mut config = Config::default();
        config.provider.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_windows() {
        let mut config = Config::default();
        config.chat.history_window = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.chat.memory_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_parses_partial_yaml() {
        let yaml = "provider:\n  model: gemini-1.5-pro\n";
        let config: Config = serde_yaml::from_str(yaml).expect("parse failed");
        assert_eq!(config.provider.model, "gemini-1.5-pro");
        // Unspecified sections fall back to defaults
        assert_eq!(config.chat.memory_window, 20);
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_config_parses_api_base_override() {
        let yaml = "provider:\n  model: m\n  api_base: http://127.0.0.1:9999\n";
        let config: Config = serde_yaml::from_str(yaml).expect("parse failed");
        assert_eq!(
            config.provider.api_base.as_deref(),
            Some("http://127.0.0.1:9999")
        );
    }

    #[test]
    #[serial]
    fn test_env_var_overrides() {
        std::env::set_var("MENTORA_MODEL", "gemini-env");
        std::env::set_var("MENTORA_DATA_DIR", "/tmp/mentora-env");

        let mut config = Config::default();
        config.apply_env_vars();

        assert_eq!(config.provider.model, "gemini-env");
        assert_eq!(
            config.storage.data_dir,
            Some(PathBuf::from("/tmp/mentora-env"))
        );

        std::env::remove_var("MENTORA_MODEL");
        std::env::remove_var("MENTORA_DATA_DIR");
    }
}
