use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use sprintboard_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `sprintboard_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Map a failed write path to a client error.
    ///
    /// Store failures while applying an update mean the derived numbers were
    /// not persisted; callers see a 400 and may retry. Other domain errors
    /// keep their usual mapping.
    pub fn from_update(err: CoreError) -> Self {
        match err {
            CoreError::Persistence(store) => {
                tracing::warn!(error = %store, "Update not persisted");
                AppError::BadRequest(format!("Update could not be persisted: {store}"))
            }
            other => AppError::Core(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Persistence(err) => {
                    tracing::error!(error = %err, "Store failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<sprintboard_core::store::StoreError> for AppError {
    fn from(err: sprintboard_core::store::StoreError) -> Self {
        AppError::Core(CoreError::Persistence(err))
    }
}
