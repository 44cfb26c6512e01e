use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TelecastError>;

/// Errors that can surface from a request handler.
#[derive(Debug, Error)]
pub enum TelecastError {
    /// The requested media path does not resolve to a readable file.
    #[error("media not found: {0}")]
    MediaNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for TelecastError {
    fn into_response(self) -> Response {
        let status = match &self {
            TelecastError::MediaNotFound(_) => StatusCode::NOT_FOUND,
            TelecastError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                StatusCode::NOT_FOUND
            }
            TelecastError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
