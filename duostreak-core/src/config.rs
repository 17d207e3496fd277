//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/duostreak/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/duostreak/` (~/.config/duostreak/)
//! - Data: `$XDG_DATA_HOME/duostreak/` (~/.local/share/duostreak/)
//! - State/Logs: `$XDG_STATE_HOME/duostreak/` (~/.local/state/duostreak/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Motivation text service configuration (optional)
    #[serde(default)]
    pub motivation: MotivationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// Motivation text service configuration
///
/// When enabled, insight requests also ask the external text-completion
/// service for a short motivational message. The service is always
/// best-effort: a failure never fails the enclosing request.
#[derive(Debug, Deserialize, Clone)]
pub struct MotivationConfig {
    /// Enable/disable motivation text generation
    #[serde(default)]
    pub enabled: bool,

    /// Text-completion service URL (e.g., `https://api.example.com`)
    pub server_url: Option<String>,

    /// Model to request from the service
    #[serde(default = "default_motivation_model")]
    pub model: String,

    /// API key (can also use env var)
    pub api_key: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_motivation_timeout")]
    pub timeout_secs: u64,
}

impl Default for MotivationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            server_url: None,
            model: default_motivation_model(),
            api_key: None,
            timeout_secs: default_motivation_timeout(),
        }
    }
}

impl MotivationConfig {
    /// Check if the motivation service is properly configured and enabled
    pub fn is_ready(&self) -> bool {
        self.enabled && self.server_url.is_some()
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.server_url.is_none() {
            return Err(Error::Config(
                "motivation.server_url is required when motivation is enabled".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "motivation.timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_motivation_model() -> String {
    "text-small".to_string()
}

fn default_motivation_timeout() -> u64 {
    10
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/duostreak/config.toml` (~/.config/duostreak/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("duostreak").join("config.toml")
    }

    /// Returns the data directory path (for the SQLite database)
    ///
    /// `$XDG_DATA_HOME/duostreak/` (~/.local/share/duostreak/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("duostreak")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/duostreak/` (~/.local/state/duostreak/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("duostreak")
    }

    /// Returns the database file path
    ///
    /// `$XDG_DATA_HOME/duostreak/data.db` (~/.local/share/duostreak/data.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/duostreak/duostreak.log` (~/.local/state/duostreak/duostreak.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("duostreak.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.motivation.enabled);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.max_files, 5);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[motivation]
enabled = true
server_url = "https://text.example.com"
model = "text-large"

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert!(config.motivation.enabled);
        assert_eq!(
            config.motivation.server_url.as_deref(),
            Some("https://text.example.com")
        );
        assert_eq!(config.motivation.model, "text-large");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_motivation_config_validation() {
        // Disabled config is always valid
        let config = MotivationConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.is_ready());

        // Enabled without a server URL should fail
        let config = MotivationConfig {
            enabled: true,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        // Enabled with a server URL should pass
        let config = MotivationConfig {
            enabled: true,
            server_url: Some("https://text.example.com".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert!(config.is_ready());
    }
}
