use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::PersistenceError;
use crate::storage::BlobError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Authentication not configured")]
    AuthNotConfigured,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Storage(#[from] BlobError),

    #[error("{0}")]
    Persistence(#[from] PersistenceError),
}

/// JSON error body returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error kind, e.g. `not_found`.
    #[schema(value_type = String)]
    pub kind: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::AuthNotConfigured => "auth_not_configured",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::Storage(_) => "storage_error",
            AppError::Persistence(_) => "persistence_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) | AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        let (error, detail) = match self {
            AppError::Validation(msg) => (msg, None),
            AppError::Unauthorized(msg) => {
                ("Invalid authentication credentials".to_string(), Some(msg))
            }
            AppError::AuthNotConfigured => (
                "Firebase authentication not configured".to_string(),
                Some("Set FIREBASE_PROJECT_ID to enable token verification".to_string()),
            ),
            AppError::Forbidden(msg) => (msg, None),
            AppError::NotFound(msg) => (msg, None),
            AppError::Storage(e) => {
                tracing::error!(error = %e, "Blob storage failure");
                ("Failed to store image".to_string(), Some(e.to_string()))
            }
            AppError::Persistence(e) => {
                tracing::error!(error = %e, "Persistence failure");
                ("A database error occurred".to_string(), None)
            }
        };

        (status, Json(ErrorBody { kind, error, detail })).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
