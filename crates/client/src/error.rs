//! Uniform failure shape of the client layer.

use devdiaries_core::DomainError;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a response (DNS, connect, TLS, reset).
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// Missing or expired credential.
    #[error("unauthorized: you are not logged in")]
    Unauthorized,

    /// A 2xx response whose body does not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("server rejected request ({status}): {message}")]
    ServerRejected { status: u16, message: String },

    /// Required fields missing before anything was sent.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] DomainError),

    #[error("email already registered")]
    EmailTaken,

    #[error("storage error: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::ServerRejected {
            status,
            message: message.into(),
        }
    }

    pub fn storage(err: anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }

    /// Text suitable for a transient in-view message.
    pub fn user_message(&self) -> String {
        match self {
            Self::NetworkFailure(_) => "Server error. Please try again later.".to_string(),
            Self::Unauthorized => "You are not logged in".to_string(),
            Self::MalformedResponse(_) => "Unexpected response from server".to_string(),
            Self::ServerRejected { message, .. } => message.clone(),
            Self::InvalidInput(DomainError::Validation(msg) | DomainError::InvalidId(msg)) => {
                msg.clone()
            }
            Self::EmailTaken => "Email already registered. Please try a different one.".to_string(),
            Self::Storage(_) => "Could not access local storage".to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::NetworkFailure(err.to_string())
    }
}
