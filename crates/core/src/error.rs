use std::io;
use std::result::Result as StdResult;

use thiserror::Error;

/// Errors that can occur while preparing a labeling session.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Template error in {path}: {message}")]
    Template { path: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Secrets parse error: {0}")]
    Secrets(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl CoreError {
    /// Whether the error was caused by user input rather than the environment.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::UnknownColumn(_))
    }

    /// Whether the error means the session cannot start at all.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Secrets(_))
    }
}

pub type Result<T> = StdResult<T, CoreError>;
