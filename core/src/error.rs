//! Error types for the care API client.
//!
//! # Design
//! Failures are surfaced as they happened: a transport failure keeps the
//! transport's reason, a non-2xx response keeps the raw status and body.
//! Nothing here maps an error onto a fallback value. Caller misuse found
//! while normalizing a payload is reported before any request is issued.

use thiserror::Error;

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),
}

/// Errors returned by `CareClient` and `CareApi`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// An identifier could not be coerced to an integer.
    #[error("field `{field}` is not a numeric id: {value:?}")]
    InvalidId { field: &'static str, value: String },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport(TransportError::Timeout))
    }
}
