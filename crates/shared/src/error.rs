use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    Internal,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            400 | 409 | 417 | 422 => ErrorCode::Validation,
            429 => ErrorCode::RateLimited,
            _ => ErrorCode::Internal,
        }
    }
}

/// Error reported by the remote API through a non-success HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code:?} (HTTP {status}): {}", .message.as_deref().unwrap_or("no details"))]
pub struct ApiError {
    pub code: ErrorCode,
    pub status: u16,
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self {
            code: ErrorCode::from_status(status),
            status,
            message: message.filter(|m| !m.trim().is_empty()),
        }
    }
}

/// Rejection of a raw answer for a question of a given kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("'{value}' is not one of the offered options ({})", .options.join(", "))]
    NotAnOption { value: String, options: Vec<String> },
    #[error("'{0}' is not a valid date; use YYYY-MM-DD")]
    InvalidDate(String),
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
}

/// Service payload that cannot be turned into domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("unrecognized question type '{0}'")]
    UnrecognizedQuestionKind(String),
    #[error("select question '{0}' has no options")]
    SelectWithoutOptions(String),
    #[error("malformed select options: {0}")]
    MalformedOptions(String),
    #[error("question carries an invalid answer: {0}")]
    InvalidAnswer(String),
    #[error("reply could not be decoded: {0}")]
    Undecodable(String),
    #[error("reply carries an unusable link '{0}'")]
    InvalidLink(String),
    #[error("reply is missing field '{0}'")]
    MissingField(&'static str),
}
