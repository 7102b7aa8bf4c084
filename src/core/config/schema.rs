//! core::config::schema
//!
//! Configuration schema types for `curveadm.cfg`.
//!
//! # Example
//!
//! ```toml
//! [defaults]
//! log_level = "error"
//! sudo_alias = "sudo"
//! timeout = 180
//!
//! [ssh_connections]
//! retries = 3
//! timeout = 10
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing; unknown keys are rejected.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Log levels accepted by `defaults.log_level`.
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Top-level `curveadm.cfg` contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AdminConfig {
    /// `[defaults]` section
    pub defaults: Option<DefaultsConfig>,

    /// `[ssh_connections]` section
    pub ssh_connections: Option<SshConfig>,
}

impl AdminConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(defaults) = &self.defaults {
            defaults.validate()?;
        }
        if let Some(ssh) = &self.ssh_connections {
            ssh.validate()?;
        }
        Ok(())
    }
}

/// `[defaults]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Logging filter for curveadm itself
    pub log_level: Option<String>,

    /// Command used to escalate privileges on remote hosts
    pub sudo_alias: Option<String>,

    /// Per-operation timeout in seconds
    pub timeout: Option<u64>,
}

impl DefaultsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(level) = &self.log_level {
            if !VALID_LOG_LEVELS.contains(&level.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid log_level '{}', must be one of: {}",
                    level,
                    VALID_LOG_LEVELS.join(", ")
                )));
            }
        }
        if let Some(alias) = &self.sudo_alias {
            if alias.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "sudo_alias cannot be empty".to_string(),
                ));
            }
        }
        if self.timeout == Some(0) {
            return Err(ConfigError::InvalidValue(
                "defaults.timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// `[ssh_connections]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SshConfig {
    /// Connection attempts before giving up
    pub retries: Option<u32>,

    /// Connect timeout in seconds
    pub timeout: Option<u64>,
}

impl SshConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout == Some(0) {
            return Err(ConfigError::InvalidValue(
                "ssh_connections.timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AdminConfig::default().validate().is_ok());
    }

    #[test]
    fn every_known_log_level_is_valid() {
        for level in VALID_LOG_LEVELS {
            let config = DefaultsConfig {
                log_level: Some(level.to_string()),
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "{level} should be valid");
        }
    }

    #[test]
    fn unknown_log_level_rejected() {
        let config = AdminConfig {
            defaults: Some(DefaultsConfig {
                log_level: Some("verbose".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn zero_timeouts_rejected() {
        let defaults = DefaultsConfig {
            timeout: Some(0),
            ..Default::default()
        };
        assert!(defaults.validate().is_err());

        let ssh = SshConfig {
            timeout: Some(0),
            ..Default::default()
        };
        assert!(ssh.validate().is_err());
    }

    #[test]
    fn blank_sudo_alias_rejected() {
        let defaults = DefaultsConfig {
            sudo_alias: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(defaults.validate().is_err());
    }

    #[test]
    fn parses_full_file() {
        let parsed: AdminConfig = toml::from_str(
            r#"
            [defaults]
            log_level = "info"
            sudo_alias = "doas"
            timeout = 300

            [ssh_connections]
            retries = 5
            timeout = 30
            "#,
        )
        .unwrap();

        let defaults = parsed.defaults.unwrap();
        assert_eq!(defaults.log_level.as_deref(), Some("info"));
        assert_eq!(defaults.sudo_alias.as_deref(), Some("doas"));
        assert_eq!(defaults.timeout, Some(300));
        assert_eq!(parsed.ssh_connections.unwrap().retries, Some(5));
    }
}
