//! core::config
//!
//! Loading of `curveadm.cfg`.
//!
//! # Locations
//!
//! Searched in order, first hit wins:
//! 1. `$CURVEADM_CONFIG` if set
//! 2. `<home>/curveadm.cfg`, where home is `$CURVEADM_HOME` or `~/.curveadm`
//!
//! A missing file is not an error; defaults are used.
//!
//! # Example
//!
//! ```no_run
//! use curveadm::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/root/.curveadm"))).unwrap();
//! println!("log level: {}", result.config.log_level());
//! println!("timeout: {}s", result.config.timeout_secs());
//! ```

pub mod schema;

pub use schema::{AdminConfig, DefaultsConfig, SshConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the configuration inside the curveadm home.
pub const CONFIG_FILE_NAME: &str = "curveadm.cfg";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Raw file contents
    pub admin: AdminConfig,
    /// Path the config was loaded from, if any
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed or
    /// validated.
    pub fn load(home: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        if let Ok(path) = std::env::var("CURVEADM_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::load_from(&path).map(|config| ConfigLoadResult { config, warnings });
            }
            warnings.push(ConfigWarning {
                message: "CURVEADM_CONFIG points to a missing file, falling back".to_string(),
                path,
            });
        }

        if let Some(home) = home {
            let path = home.join(CONFIG_FILE_NAME);
            if path.exists() {
                return Self::load_from(&path).map(|config| ConfigLoadResult { config, warnings });
            }
        }

        Ok(ConfigLoadResult {
            config: Config::default(),
            warnings,
        })
    }

    /// Load and validate a specific config file.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let admin: AdminConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        admin.validate()?;

        Ok(Config {
            admin,
            loaded_from: Some(path.to_path_buf()),
        })
    }

    /// Logging filter. Defaults to `error`.
    pub fn log_level(&self) -> &str {
        self.defaults()
            .and_then(|d| d.log_level.as_deref())
            .unwrap_or("error")
    }

    /// Privilege escalation command. Defaults to `sudo`.
    pub fn sudo_alias(&self) -> &str {
        self.defaults()
            .and_then(|d| d.sudo_alias.as_deref())
            .unwrap_or("sudo")
    }

    /// Operation timeout in seconds. Defaults to 180.
    pub fn timeout_secs(&self) -> u64 {
        self.defaults().and_then(|d| d.timeout).unwrap_or(180)
    }

    /// SSH connection attempts. Defaults to 3.
    pub fn ssh_retries(&self) -> u32 {
        self.admin
            .ssh_connections
            .as_ref()
            .and_then(|s| s.retries)
            .unwrap_or(3)
    }

    /// SSH connect timeout in seconds. Defaults to 10.
    pub fn ssh_timeout_secs(&self) -> u64 {
        self.admin
            .ssh_connections
            .as_ref()
            .and_then(|s| s.timeout)
            .unwrap_or(10)
    }

    /// Path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }

    fn defaults(&self) -> Option<&DefaultsConfig> {
        self.admin.defaults.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file() {
        let config = Config::default();

        assert_eq!(config.log_level(), "error");
        assert_eq!(config.sudo_alias(), "sudo");
        assert_eq!(config.timeout_secs(), 180);
        assert_eq!(config.ssh_retries(), 3);
        assert_eq!(config.ssh_timeout_secs(), 10);
        assert!(config.loaded_from().is_none());
    }

    #[test]
    fn load_from_home() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[defaults]\nlog_level = \"debug\"\ntimeout = 60\n",
        )
        .unwrap();

        let config = Config::load_from(&temp.path().join(CONFIG_FILE_NAME)).unwrap();

        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.timeout_secs(), 60);
        assert_eq!(config.sudo_alias(), "sudo");
        assert!(config.loaded_from().is_some());
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[defaults]\ncolour = true\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn invalid_value_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[ssh_connections]\ntimeout = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn missing_file_is_read_error() {
        let temp = TempDir::new().unwrap();
        let err = Config::load_from(&temp.path().join("absent.cfg")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
