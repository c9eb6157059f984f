//! Error types for the Lichess client

use lichess_model::MapError;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with a non-200 status. `message` is the server's
    /// own error string when it sent one.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected payload: {0}")]
    Mapping(#[from] MapError),

    #[error("Stream read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid server address: {0}")]
    InvalidAddress(String),

    /// A parameter was rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    #[error("Server returned invalid data: {0}")]
    InvalidData(String),

    #[error("Stream handler panicked: {0}")]
    HandlerPanicked(String),

    #[error("Mock response not configured for: {0}")]
    NotConfigured(String),
}

impl ClientError {
    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
