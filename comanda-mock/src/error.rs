//! Error responses of the mock backend

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::client::ErrorBody;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MockError {
    #[error("Token ausente ou inválido")]
    Unauthorized,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Injected failure, see [`crate::AppState::fail_tab_detail`]
    #[error("{0}")]
    Unavailable(String),
}

impl MockError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = status.as_u16(), error = %self, "Rejecting request");
        let body = ErrorBody {
            error: Some(self.to_string()),
            message: None,
        };
        (status, Json(body)).into_response()
    }
}

pub type MockResult<T> = Result<T, MockError>;
