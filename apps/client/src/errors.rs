use serde::Deserialize;
use thiserror::Error;

use crate::gateway::transport::TransportError;
use crate::storage::StorageError;

/// Client-level error type.
/// Every API wrapper, the session store and the résumé cache return `Result<T, ClientError>`.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Authentication failed (status {status}): {message}")]
    Authentication { status: u16, message: String },

    #[error("Validation error (status {status}): {message}")]
    Validation { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error (status {status}): {message}")]
    Server { status: u16, message: String },

    #[error("HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] TransportError),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Coarse classification used by callers to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    Validation,
    NotFound,
    Server,
    Network,
    Other,
}

/// FastAPI error envelope: `{"detail": "..."}` or `{"detail": [{"msg": "..."}, ...]}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ClientError {
    /// Maps a non-success HTTP status and its body onto the error taxonomy.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let message = extract_detail(body);
        match status {
            401 => ClientError::Authentication { status, message },
            404 => ClientError::NotFound(message),
            400 | 409 | 422 => ClientError::Validation { status, message },
            500..=599 => ClientError::Server { status, message },
            _ => ClientError::Http { status, message },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Authentication { .. } => ErrorKind::Authentication,
            ClientError::Validation { .. } | ClientError::Rejected(_) => ErrorKind::Validation,
            ClientError::NotFound(_) => ErrorKind::NotFound,
            ClientError::Server { .. } => ErrorKind::Server,
            ClientError::Network(_) => ErrorKind::Network,
            ClientError::Http { .. } | ClientError::Decode(_) | ClientError::Storage(_) => {
                ErrorKind::Other
            }
        }
    }

    pub fn is_authentication(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }

    /// The HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Authentication { status, .. }
            | ClientError::Validation { status, .. }
            | ClientError::Server { status, .. }
            | ClientError::Http { status, .. } => Some(*status),
            ClientError::NotFound(_) => Some(404),
            _ => None,
        }
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Authentication => "Your session has expired. Please sign in again.",
            ErrorKind::Validation => "Invalid file format or data. Please try again.",
            ErrorKind::NotFound => "No resume found.",
            ErrorKind::Server => "Server error. Please try again later.",
            ErrorKind::Network => "Could not reach the server. Check your connection.",
            ErrorKind::Other => "An error occurred. Please try again.",
        }
    }
}

fn extract_detail(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(ErrorBody {
            detail: serde_json::Value::Array(items),
        }) => items
            .iter()
            .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
            .collect::<Vec<_>>()
            .join("; "),
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => String::from_utf8_lossy(body).trim().to_string(),
    }
}
