//! Assessment Settings
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! settings file, then `WORKRISK__`-prefixed environment variables
//! (`WORKRISK__LOGGING__FORMAT=json`, `WORKRISK__ENGINE__CONFIG_PATH=...`).

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use health_score::HealthPolicy;
use serde::{Deserialize, Serialize};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "WORKRISK";

/// Where the fuzzy configuration document lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub config_path: PathBuf,
    /// Write the built-in document when `config_path` does not exist
    pub create_if_missing: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("config/fuzzy_config.json"),
            create_if_missing: true,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Maximum level: trace, debug, info, warn or error
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Plain,
        }
    }
}

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentSettings {
    pub engine: EngineSettings,
    pub health: HealthPolicy,
    pub logging: LoggingSettings,
}

impl AssessmentSettings {
    /// Load defaults, an optional settings file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
