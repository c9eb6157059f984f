//! Error types for payload mapping

use thiserror::Error;

pub type MapResult<T> = Result<T, MapError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("Expected a JSON object or array, found {0}")]
    NotAContainer(&'static str),

    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    #[error("Attribute {name} is not {expected}")]
    UnexpectedType {
        name: String,
        expected: &'static str,
    },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Index {0} out of range")]
    IndexOutOfRange(usize),
}
