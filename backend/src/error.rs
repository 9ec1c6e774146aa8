//! Error types shared by the storage, domain and REST layers.
//!
//! `StorageError` is what repositories return; `ShiftError` is what services
//! return and what handlers turn into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use thiserror::Error;
use tracing::error;

/// Failure reported by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be converted into a domain value
    #[error("corrupt row in {table}: {reason}")]
    Corrupt { table: &'static str, reason: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reported by a domain service
#[derive(Debug, Error)]
pub enum ShiftError {
    /// Rejected before any storage call was made
    #[error("{0}")]
    Validation(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Single-day assignment stopped at `employee_id`; earlier rows stay committed
    #[error("Failed to assign employee {employee_id} ({created} assignments created before the failure): {source}")]
    QuickAssignFailed {
        employee_id: i64,
        created: usize,
        #[source]
        source: StorageError,
    },

    #[error("Missing or invalid API key")]
    Unauthorized,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ShiftError {
    pub fn validation(message: impl Into<String>) -> Self {
        ShiftError::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ShiftError::NotFound { entity, id }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ShiftError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ShiftError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            ShiftError::QuickAssignFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "quick_assign_failed")
            }
            ShiftError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ShiftError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        }
    }
}

impl IntoResponse for ShiftError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            ShiftError::Storage(e) => {
                error!("Storage request failed: {}", e);
                "Backend storage request failed".to_string()
            }
            other => other.to_string(),
        };

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ShiftError::validation("bad").status_and_code().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ShiftError::not_found("Shift", 3).status_and_code().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ShiftError::Unauthorized.status_and_code().0,
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_quick_assign_failure_names_employee() {
        let err = ShiftError::QuickAssignFailed {
            employee_id: 17,
            created: 2,
            source: StorageError::Corrupt {
                table: "shift_assignments",
                reason: "boom".to_string(),
            },
        };

        let message = err.to_string();
        assert!(message.contains("employee 17"));
        assert!(message.contains("boom"));
    }
}
