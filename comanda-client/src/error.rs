//! Client error types

use shared::input::InputError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection refused, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Refused before sending (e.g. an id that cannot go into a URL path)
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    /// Body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required or credentials rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend refused the request (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-2xx status
    #[error("API error {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Api { status: u16, message: Option<String> },
}

impl ClientError {
    /// Message provided by the backend, if the error body carried one.
    pub fn server_message(&self) -> Option<&str> {
        let text = match self {
            Self::Unauthorized(m) | Self::Forbidden(m) | Self::NotFound(m) | Self::Validation(m) => {
                m.as_str()
            }
            Self::Api { message, .. } => message.as_deref()?,
            Self::Http(_) | Self::Input(_) | Self::InvalidResponse(_) => return None,
        };
        let text = text.trim();
        (!text.is_empty()).then_some(text)
    }

    /// HTTP status for errors that came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Validation(_) => Some(400),
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Input(_) | Self::InvalidResponse(_) => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
