//! Error types for the posts client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers usually treat a
//! missing post as absence, not failure. `Validation` is raised before any
//! request is sent. Transport failures carry a `TransportErrorKind` so that
//! timeouts can be told apart from refused connections. All remaining
//! non-2xx responses are wrapped in an `ErrorEnvelope` with the raw status
//! and body.

use serde::Serialize;
use thiserror::Error;

/// Errors returned by `ResourceClient` operations and `PostsClient` parsers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller input was rejected before any request was made.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The request never produced an HTTP response.
    #[error("{kind} transport error: {message}")]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The response body did not have the expected shape.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The server returned a non-2xx status other than 404.
    #[error("{0}")]
    Http(ErrorEnvelope),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Other,
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Other => "network",
        };
        f.write_str(s)
    }
}

/// Coarse classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Validation,
    Transport,
    Timeout,
    NotFound,
    Decode,
    ClientError,
    ServerError,
    Unexpected,
}

impl StatusCategory {
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => StatusCategory::NotFound,
            400..=499 => StatusCategory::ClientError,
            500..=599 => StatusCategory::ServerError,
            _ => StatusCategory::Unexpected,
        }
    }
}

/// Description of a failed call, suitable for logging or returning to a
/// caller as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub category: StatusCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ErrorEnvelope {
    pub fn from_response(status: u16, body: &str) -> Self {
        Self {
            category: StatusCategory::from_status(status),
            message: format!("HTTP {status}"),
            status: Some(status),
            body: (!body.is_empty()).then(|| body.to_string()),
        }
    }
}

impl std::fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.body {
            Some(body) => write!(f, "{}: {body}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl ApiError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub(crate) fn decode(err: impl std::fmt::Display) -> Self {
        ApiError::Decode(err.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ApiError::Transport {
                kind: TransportErrorKind::Timeout,
                ..
            }
        )
    }

    /// Project any error into an `ErrorEnvelope`.
    pub fn envelope(&self) -> ErrorEnvelope {
        let category = match self {
            ApiError::Http(envelope) => return envelope.clone(),
            ApiError::Validation(_) => StatusCategory::Validation,
            ApiError::Transport {
                kind: TransportErrorKind::Timeout,
                ..
            } => StatusCategory::Timeout,
            ApiError::Transport { .. } => StatusCategory::Transport,
            ApiError::NotFound => StatusCategory::NotFound,
            ApiError::Decode(_) => StatusCategory::Decode,
        };
        ErrorEnvelope {
            category,
            message: self.to_string(),
            status: self.is_not_found().then_some(404),
            body: None,
        }
    }
}
