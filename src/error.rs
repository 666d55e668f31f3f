//! Error types for the comment editor
//!
//! Validation problems are recovered locally by the view; configuration
//! errors are fatal at construction; write failures travel to the host
//! together with a retry handle.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level editor error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// Post data was rejected before any collaborator was contacted
    #[error("Invalid post: {0}")]
    Validation(String),

    /// Required construction options are missing or unusable
    #[error("Editor misconfigured: {0}")]
    Configuration(String),

    /// The session provider failed to start a login flow
    #[error("Login delegation failed: {0}")]
    Login(String),

    /// The write collaborator reported a failure
    #[error("Write failed: {0}")]
    Write(#[from] WriteError),

    /// A previous write has not completed yet
    #[error("A post is already being written")]
    WriteInFlight,

    /// Template compilation or rendering failed
    #[error("Template error: {0}")]
    Template(String),

    /// The host surface could not be driven (missing element, DOM failure)
    #[error("Host surface error: {0}")]
    Host(String),
}

impl From<mustache::Error> for EditorError {
    fn from(err: mustache::Error) -> Self {
        EditorError::Template(err.to_string())
    }
}

/// Failure reported by a write collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct WriteError {
    pub message: String,

    /// Collaborator-specific error code, when one was supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl WriteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;
