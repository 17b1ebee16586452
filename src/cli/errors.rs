//! CLI-specific error types
//!
//! Any CLI error terminates the process with a non-zero exit code.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("LEDGERDOC_CLI_CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    #[error("LEDGERDOC_CLI_IO_ERROR: {0}")]
    Io(#[from] io::Error),

    #[error("LEDGERDOC_CLI_IO_ERROR: JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
