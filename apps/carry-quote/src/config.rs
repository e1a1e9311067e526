//! # Quote Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --catalog ./catalog --log-level debug --pretty                     │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     CARRY_CATALOG_DIR=/srv/catalog                                     │
//! │     CARRY_LOG_LEVEL=debug                                              │
//! │     CARRY_PRETTY=true                                                  │
//! │                                                                         │
//! │  3. TOML Config File (--config, or the platform default)               │
//! │     ~/.config/carry/quote.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.carry.carry/quote.toml (macOS)   │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # quote.toml
//! catalog_dir = "/srv/carry/catalog"
//! log_level = "info"   # trace | debug | info | warn | error
//! pretty = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::cli::Cli;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value is present but unusable.
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Quote Config
// =============================================================================

/// Settings for the quote CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Directory of product definitions.
    #[serde(default = "default_catalog_dir")]
    pub catalog_dir: PathBuf,

    /// Log level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Pretty-print JSON output.
    #[serde(default)]
    pub pretty: bool,
}

fn default_catalog_dir() -> PathBuf {
    PathBuf::from("catalog")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for QuoteConfig {
    fn default() -> Self {
        QuoteConfig {
            catalog_dir: default_catalog_dir(),
            log_level: default_log_level(),
            pretty: false,
        }
    }
}

impl QuoteConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else the platform `quote.toml`)
    /// 3. Environment variables
    ///
    /// A missing platform file is not an error; a missing explicit file is.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound { path }),
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                path => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(path = %path.display(), "Loading quote config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.catalog_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "catalog_dir",
                reason: "must not be empty".into(),
            });
        }
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Invalid {
                field: "log_level",
                reason: format!(
                    "unknown level '{}'. Valid options: {}",
                    self.log_level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }
        Ok(())
    }

    /// Applies `CARRY_*` overrides; `lookup` reads one variable.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("CARRY_CATALOG_DIR") {
            debug!(catalog_dir = %dir, "Overriding catalog dir from environment");
            self.catalog_dir = PathBuf::from(dir);
        }

        if let Some(level) = lookup("CARRY_LOG_LEVEL") {
            self.log_level = level.to_lowercase();
        }

        if let Some(pretty) = lookup("CARRY_PRETTY") {
            match pretty.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.pretty = true,
                "0" | "false" | "no" | "off" => self.pretty = false,
                _ => tracing::warn!(value = %pretty, "Unknown CARRY_PRETTY value in environment"),
            }
        }
    }

    /// Applies command-line flags on top of everything else.
    pub fn apply_cli(&mut self, cli: &Cli) -> ConfigResult<()> {
        if let Some(dir) = &cli.catalog {
            self.catalog_dir = dir.clone();
        }
        if let Some(level) = &cli.log_level {
            self.log_level = level.to_lowercase();
        }
        if cli.pretty {
            self.pretty = true;
        }
        self.validate()
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "carry", "carry")
            .map(|dirs| dirs.config_dir().join("quote.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = QuoteConfig::default();
        assert_eq!(config.catalog_dir, PathBuf::from("catalog"));
        assert_eq!(config.log_level, "info");
        assert!(!config.pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quote.toml");
        std::fs::write(&path, "catalog_dir = \"/srv/catalog\"\npretty = true\n").unwrap();

        let config = QuoteConfig::from_file(&path).unwrap();
        assert_eq!(config.catalog_dir, PathBuf::from("/srv/catalog"));
        assert_eq!(config.log_level, "info");
        assert!(config.pretty);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = QuoteConfig::load(Some(dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quote.toml");
        std::fs::write(&path, "pretty = maybe").unwrap();
        assert!(matches!(
            QuoteConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("CARRY_CATALOG_DIR", "/tmp/catalog"),
            ("CARRY_LOG_LEVEL", "DEBUG"),
            ("CARRY_PRETTY", "yes"),
        ]
        .into_iter()
        .collect();

        let mut config = QuoteConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.catalog_dir, PathBuf::from("/tmp/catalog"));
        assert_eq!(config.log_level, "debug");
        assert!(config.pretty);
    }

    #[test]
    fn test_validation() {
        let mut config = QuoteConfig::default();
        config.log_level = "loud".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "log_level", .. })
        ));

        config.log_level = "warn".into();
        config.catalog_dir = PathBuf::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "catalog_dir", .. })
        ));
    }

    #[test]
    fn test_cli_overrides_win() {
        let cli = Cli::parse_from([
            "carry-quote",
            "--product",
            "rank-boost",
            "--preview",
            "--catalog",
            "/opt/catalog",
            "--log-level",
            "trace",
        ]);
        let mut config = QuoteConfig {
            pretty: true,
            ..QuoteConfig::default()
        };
        config.apply_cli(&cli).unwrap();

        assert_eq!(config.catalog_dir, PathBuf::from("/opt/catalog"));
        assert_eq!(config.log_level, "trace");
        assert!(config.pretty);
    }
}
