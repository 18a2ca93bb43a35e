//! Error types

use thiserror::Error;

/// Crate-wide error. Configuration variants are fatal before the frame loop starts.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Cannot read config {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown gesture '{name}' in {path}")]
    UnknownGesture { path: String, name: String },

    #[error("Invalid action '{value}' for gesture '{gesture}'")]
    InvalidAction { gesture: String, value: String },

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Frame input error: {0}")]
    Input(#[from] std::io::Error),
}

/// Failure reported by an action executor. Dropped by the dispatcher, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    #[error("Executor unavailable")]
    Unavailable,
}

/// Action string that matches none of the vocabulary forms
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized action '{0}'")]
pub struct ParseActionError(pub String);

pub type Result<T> = std::result::Result<T, Error>;
