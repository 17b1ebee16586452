//! Runtime configuration
//!
//! Loaded from a JSON file. Every field is optional:
//!
//! ```json
//! {
//!   "app_version": "1.0",
//!   "index_maintenance": "maintain",
//!   "log_level": "info",
//!   "user_namespace": "userInfo_"
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{Logger, Severity};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How status index entries follow status changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMaintenance {
    /// Status-changing mutations move the index entry
    #[default]
    Maintain,
    /// Entries are written at creation only and go stale afterwards
    Compat,
}

/// Minimum log severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn severity(&self) -> Severity {
        match self {
            LogLevel::Trace => Severity::Trace,
            LogLevel::Info => Severity::Info,
            LogLevel::Warn => Severity::Warn,
            LogLevel::Error => Severity::Error,
        }
    }
}

fn default_app_version() -> String {
    "1.0".to_string()
}

fn default_user_namespace() -> String {
    "userInfo_".to_string()
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Value written to the `demo_ui` marker by Init
    #[serde(default = "default_app_version")]
    pub app_version: String,

    #[serde(default)]
    pub index_maintenance: IndexMaintenance,

    #[serde(default)]
    pub log_level: LogLevel,

    /// Key prefix of UserInfo documents
    #[serde(default = "default_user_namespace")]
    pub user_namespace: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_version: default_app_version(),
            index_maintenance: IndexMaintenance::default(),
            log_level: LogLevel::default(),
            user_namespace: default_user_namespace(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Parse and validate configuration JSON
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.app_version.is_empty() {
            return Err(ConfigError::Invalid("app_version must not be empty".into()));
        }
        if self.user_namespace.is_empty() {
            return Err(ConfigError::Invalid("user_namespace must not be empty".into()));
        }
        if self.user_namespace.contains('\u{0}') {
            return Err(ConfigError::Invalid(
                "user_namespace must not contain U+0000".into(),
            ));
        }
        Ok(())
    }

    /// Install the configured log level process-wide
    pub fn apply_logging(&self) {
        Logger::set_min_severity(self.log_level.severity());
    }
}
