//! Error types for deadsweep
//!
//! Recoverable per-file problems (unreadable sources, malformed translations)
//! are logged and skipped where they happen. Everything that reaches a caller
//! is a `SweepError`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while sweeping a project
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XML in {path}: {message}")]
    Xml { path: PathBuf, message: String },

    #[error("Base resource file not found: {path}")]
    MissingBase { path: PathBuf },

    #[error("Invalid usage pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl SweepError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SweepError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn xml(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        SweepError::Xml {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SweepError>;
