//! SDK Error Types

use crate::request::Response;
use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, LuisError>;

/// SDK Error
///
/// Management calls and recognition calls format their HTTP failures
/// differently (`Request` vs `Recognition`). Callers match on the message
/// text of both, so the two variants stay separate.
#[derive(Debug, Error)]
pub enum LuisError {
    /// Non-2xx response from the authoring API
    #[error("{message}")]
    Request {
        status_code: u16,
        message: String,
        response: Box<Response>,
    },

    /// Non-200 response from the prediction endpoint
    #[error("LUIS returned HTTP {status_code}: {status_message}")]
    Recognition {
        status_code: u16,
        status_message: String,
    },

    /// At least one model reported `Fail`; carries the raw status body
    #[error("Training failed: {body}")]
    TrainingFailed { body: serde_json::Value },

    #[error("Cannot find LUIS app")]
    AppNotFound,

    #[error("Training wait cancelled")]
    Cancelled,

    #[error("Training still in progress after {attempts} polls")]
    PollLimitExceeded { attempts: u32 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl LuisError {
    /// HTTP status code, when the error came from a completed response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LuisError::Request { status_code, .. } | LuisError::Recognition { status_code, .. } => {
                Some(*status_code)
            }
            LuisError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
