//! Configuration management for the HSS credential core
//!
//! Defaults, environment overrides (`HSS_LOG_*`, `HSS_PROVISIONING_*`), and TOML files,
//! all funnelled through [`HssConfig::validate`].

use crate::credentials::auth_scheme::{encode_flags, AuthSchemeFlag, ALL_SCHEMES_MASK};
use crate::logging::{LogConfig, LogLevel};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

mod error;

pub use error::ConfigError;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HssConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Identity provisioning defaults
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include timestamps
    pub with_timestamp: bool,

    /// Include target module
    pub with_target: bool,
}

/// Defaults applied to identities created through the admin use-cases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    /// Schemes ticked on a brand-new identity
    pub default_auth_schemes: Vec<AuthSchemeFlag>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamp: true,
            with_target: true,
        }
    }
}

impl LoggingConfig {
    /// Subscriber settings for [`crate::logging::init_logging_with_config`]
    pub fn to_log_config(&self) -> Result<LogConfig, ConfigError> {
        let level: LogLevel = self.level.parse().map_err(|_| ConfigError::InvalidValue {
            var: "logging.level",
            reason: format!("unknown level {:?}", self.level),
        })?;

        Ok(LogConfig::new(level)
            .with_timestamp(self.with_timestamp)
            .with_target(self.with_target)
            .json_format(self.json_format))
    }
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            default_auth_schemes: vec![AuthSchemeFlag::AkaV1],
        }
    }
}

impl ProvisioningConfig {
    /// Mask a new identity starts with
    pub fn default_mask(&self) -> u32 {
        encode_flags(self.default_auth_schemes.iter().copied())
    }

    /// A new identity must start with at least one scheme and never with
    /// the "all" sentinel.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mask = self.default_mask();
        if mask == 0 {
            return Err(ConfigError::ValidationFailed(
                "default_auth_schemes must name at least one scheme".to_string(),
            ));
        }
        if mask == ALL_SCHEMES_MASK {
            return Err(ConfigError::ValidationFailed(
                "default_auth_schemes must not enable every scheme".to_string(),
            ));
        }

        Ok(())
    }
}

impl HssConfig {
    /// Load configuration from environment variables
    ///
    /// Recognised variables:
    /// - `HSS_LOG_LEVEL`
    /// - `HSS_LOG_JSON`
    /// - `HSS_LOG_TIMESTAMP`
    /// - `HSS_LOG_TARGET`
    /// - `HSS_PROVISIONING_DEFAULT_AUTH_SCHEME` (comma separated scheme names)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(level) = env::var("HSS_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(json) = env_bool("HSS_LOG_JSON")? {
            config.logging.json_format = json;
        }
        if let Some(timestamp) = env_bool("HSS_LOG_TIMESTAMP")? {
            config.logging.with_timestamp = timestamp;
        }
        if let Some(target) = env_bool("HSS_LOG_TARGET")? {
            config.logging.with_target = target;
        }

        if let Ok(schemes) = env::var("HSS_PROVISIONING_DEFAULT_AUTH_SCHEME") {
            config.provisioning.default_auth_schemes = parse_scheme_list(&schemes)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: Self = toml::from_str(&contents)?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging
            .to_log_config()
            .map_err(|e| ConfigError::ValidationFailed(e.to_string()))?;
        self.provisioning.validate()
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)?;

        std::fs::write(path, contents)
            .map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(())
    }
}

fn env_bool(var: &'static str) -> Result<Option<bool>, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                var,
                reason: format!("{}", e),
            }),
        Err(_) => Ok(None),
    }
}

fn parse_scheme_list(list: &str) -> Result<Vec<AuthSchemeFlag>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            name.parse::<AuthSchemeFlag>().map_err(|e| ConfigError::InvalidValue {
                var: "HSS_PROVISIONING_DEFAULT_AUTH_SCHEME",
                reason: format!("{}", e),
            })
        })
        .collect()
}
