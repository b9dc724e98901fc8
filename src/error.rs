use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

pub const NOT_FOUND_MESSAGE: &str = "No registrations found yet.";

/// Every failure a request can end in. Rendered as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    MissingFieldOrFile(&'static str),
    /// The multipart stream broke. Carries the parser's status, which is 413
    /// when the body limit was hit.
    #[error("{message}")]
    MalformedForm { status: StatusCode, message: String },
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,
    /// The message is echoed to the client. Acceptable for an internal tool.
    #[error("{0:#}")]
    Persistence(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFieldOrFile(_) => StatusCode::BAD_REQUEST,
            Self::MalformedForm { status, .. } => *status,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
