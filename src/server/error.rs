//! Mapping from [`NoteSyncError`] to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::NoteSyncError;

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Handler error. Wraps the crate error and picks the status code.
#[derive(Debug)]
pub struct ApiError(pub NoteSyncError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            NoteSyncError::Validation(_) => StatusCode::BAD_REQUEST,
            NoteSyncError::NoteNotFound(_) => StatusCode::NOT_FOUND,
            NoteSyncError::Unauthenticated => StatusCode::UNAUTHORIZED,
            NoteSyncError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            NoteSyncError::NotInitialized
            | NoteSyncError::AlreadyInitialized
            | NoteSyncError::Config(_)
            | NoteSyncError::Io(_)
            | NoteSyncError::Json(_)
            | NoteSyncError::Yaml(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match &self.0 {
            // Sent bare; the client re-wraps it in its own Validation error.
            NoteSyncError::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<NoteSyncError> for ApiError {
    fn from(err: NoteSyncError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }
        (status, Json(ErrorBody { message: self.message() })).into_response()
    }
}
