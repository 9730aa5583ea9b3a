use std::path::PathBuf;

use costream::runtime::{BoardError, ConfigError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplayError>;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Board(#[from] BoardError),

    #[error("script line {line}: {message}")]
    ScriptParse { line: usize, message: String },

    #[error("script not found: {path}")]
    MissingScript { path: PathBuf },

    #[error("step {step} rejected: {message}")]
    StepRejected { step: usize, message: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl ReplayError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ScriptParse { .. } | Self::MissingScript { .. } | Self::InvalidArgument { .. } => {
                2
            }
            Self::StepRejected { .. } => 3,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
