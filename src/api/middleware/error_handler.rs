//! Maps `AppError` to HTTP responses.
//!
//! Domain errors carry distinct machine-readable codes. Internal detail
//! (database messages, source chains) never leaves the process; it is
//! logged here and replaced with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    /// Status code mapping:
    /// - Validation / BadRequest → 400
    /// - CapacityExceeded → 400 (distinct code, user-facing message)
    /// - Unauthorized → 401
    /// - Forbidden → 403
    /// - NotFound → 404
    /// - Duplicate / SlotConflict → 409
    /// - Database / Internal → 500
    /// - ConnectionPool → 503
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Validation { field, reason } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("VALIDATION_ERROR", reason).with_details(field),
            ),
            AppError::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("BAD_REQUEST", message),
            ),
            AppError::CapacityExceeded { .. } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(
                    "CAPACITY_EXCEEDED",
                    "This session is fully booked; no places remain",
                ),
            ),
            AppError::SlotConflict { .. } => (
                StatusCode::CONFLICT,
                ErrorResponse::new("SLOT_CONFLICT", "This slot has already been booked"),
            ),
            AppError::Unauthorized { message } => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("UNAUTHORIZED", message),
            ),
            AppError::Forbidden { message } => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new("FORBIDDEN", message),
            ),
            AppError::NotFound {
                entity,
                field,
                value,
            } => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(
                    "NOT_FOUND",
                    &format!("{} with {}={} was not found", entity, field, value),
                ),
            ),
            AppError::Duplicate {
                entity,
                field,
                value,
            } => (
                StatusCode::CONFLICT,
                ErrorResponse::new(
                    "DUPLICATE",
                    &format!("{}.{} = '{}' already exists", entity, field, value),
                ),
            ),
            AppError::Database { operation, source } => {
                tracing::error!(operation = %operation, error = %source, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("DATABASE_ERROR", "A storage error occurred"),
                )
            }
            AppError::ConnectionPool { source } => {
                tracing::error!(error = %source, "Connection pool error");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable"),
                )
            }
            AppError::Internal { source } => {
                tracing::error!(error = %source, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred"),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn capacity_exceeded_is_a_bad_request_not_a_server_error() {
        let status = status_of(AppError::CapacityExceeded {
            availability_id: 1,
            capacity: 2,
        });
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn slot_conflict_maps_to_conflict() {
        let status = status_of(AppError::SlotConflict { availability_id: 1 });
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn not_found_is_distinct_from_server_error() {
        let status = status_of(AppError::NotFound {
            entity: "availability".to_string(),
            field: "id".to_string(),
            value: "9".to_string(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_detail_is_not_leaked() {
        let response = AppError::Internal {
            source: anyhow::anyhow!("secret connection string"),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_and_auth_statuses() {
        assert_eq!(
            status_of(AppError::Validation {
                field: "price".to_string(),
                reason: "bad".to_string()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Unauthorized {
                message: "no".to_string()
            }),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Forbidden {
                message: "no".to_string()
            }),
            StatusCode::FORBIDDEN
        );
    }
}
