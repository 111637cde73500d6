//! Configuration management
//!
//! This module handles loading, validation, and management of the PluginGate
//! configuration. Configuration is stored in TOML format at
//! ~/.plugingate/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Environment mode and log level
//! - **plugins**: Plugin IDs allowed to load without a signature
//!
//! # Environment Overrides
//!
//! After the file is read, these variables take precedence:
//!
//! - `PLUGINGATE_ENV`: environment mode (development, production, test)
//! - `PLUGINGATE_ALLOW_UNSIGNED_PLUGINS`: comma-separated plugin IDs,
//!   replacing the file's allow-list
//!
//! # Examples
//!
//! ```no_run
//! use plugingate_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//! println!("Environment: {}", config.core.env);
//! let policy = config.signature_policy();
//! # Ok(())
//! # }
//! ```

use plugin_signature::{Environment, SignaturePolicy};
use sdk::errors::EngineError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `core.env`
pub const ENV_OVERRIDE: &str = "PLUGINGATE_ENV";

/// Environment variable overriding `plugins.allow_loading_unsigned_plugins`
pub const ALLOW_UNSIGNED_OVERRIDE: &str = "PLUGINGATE_ALLOW_UNSIGNED_PLUGINS";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Core settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Plugin loading policy
    #[serde(default)]
    pub plugins: PluginsConfig,
}

/// Core configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Environment mode; only development relaxes signature checks
    #[serde(default)]
    pub env: Environment,

    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            env: Environment::default(),
            log_level: default_log_level(),
        }
    }
}

/// Plugin loading configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginsConfig {
    /// Plugin IDs allowed to load unsigned
    ///
    /// Accepts either a list or a single comma-separated string.
    #[serde(default, deserialize_with = "string_or_list")]
    pub allow_loading_unsigned_plugins: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::One(value) => split_plugin_ids(&value),
        StringOrList::Many(values) => values,
    })
}

fn split_plugin_ids(value: &str) -> Vec<String> {
    value.split(',').map(|id| id.trim().to_string()).collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default location (~/.plugingate/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read or written
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_or_create() -> Result<Self, EngineError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment overrides are applied after parsing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - An override or the resulting configuration is invalid
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config = Self::from_toml(&contents)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate_and_process()?;

        Ok(config)
    }

    /// Parse configuration from TOML text, without environment overrides
    pub fn from_toml(contents: &str) -> Result<Self, EngineError> {
        let mut config: Config = toml::from_str(contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate_and_process()?;
        Ok(config)
    }

    /// Create default configuration and save to path
    fn create_default(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let mut config = Self::default();

        let toml_string = config.to_toml()?;
        fs::write(path, toml_string)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {}", e)))?;

        // Overrides apply to the running process only, never to the saved file
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate_and_process()?;
        Ok(config)
    }

    /// Get the default configuration file path (~/.plugingate/config.toml)
    pub fn default_config_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".plugingate").join("config.toml"))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply overrides from `lookup`, normally the process environment
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_OVERRIDE) {
            self.core.env = Environment::parse(&value).ok_or_else(|| {
                EngineError::Config(format!(
                    "Invalid {} '{}'. Must be one of: development, production, test",
                    ENV_OVERRIDE, value
                ))
            })?;
        }

        if let Some(value) = lookup(ALLOW_UNSIGNED_OVERRIDE) {
            self.plugins.allow_loading_unsigned_plugins = split_plugin_ids(&value);
        }

        Ok(())
    }

    /// Validate and normalize configuration
    ///
    /// Allow-list entries are trimmed, empty entries dropped and duplicates
    /// removed, keeping the first occurrence.
    fn validate_and_process(&mut self) -> Result<(), EngineError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        let mut seen = Vec::new();
        for id in self.plugins.allow_loading_unsigned_plugins.drain(..) {
            let id = id.trim().to_string();
            if !id.is_empty() && !seen.contains(&id) {
                seen.push(id);
            }
        }
        self.plugins.allow_loading_unsigned_plugins = seen;

        Ok(())
    }

    /// Signature policy derived from this configuration
    pub fn signature_policy(&self) -> SignaturePolicy {
        SignaturePolicy::new(
            self.core.env,
            self.plugins.allow_loading_unsigned_plugins.iter().cloned(),
        )
    }
}
