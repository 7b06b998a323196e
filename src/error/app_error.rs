use crate::error::DatabaseErrorConverter;
use thiserror::Error;

/// Application-wide error type covering validation, domain, and
/// infrastructure failures.
///
/// The two booking-specific variants deserve a note: `SlotConflict` is the
/// typed outcome observed by the loser of a claim race on a single-unit
/// slot, and `CapacityExceeded` is the course-variant equivalent. Both are
/// user-facing and must stay distinguishable from `NotFound` and from
/// generic persistence failures.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Duplicate entry error for unique constraint violations
    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// The slot exists but every capacity unit is already claimed
    #[error("Availability {availability_id} is already booked")]
    SlotConflict { availability_id: i32 },

    /// Course reservation limit reached; rendered as a distinct
    /// "fully booked" message so clients can special-case it
    #[error("Reservation limit of {capacity} reached for availability {availability_id}")]
    CapacityExceeded { availability_id: i32, capacity: i32 },

    /// Unauthorized access error with authentication message
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Forbidden access error with authorization message
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

impl From<diesel_async::pooled_connection::bb8::RunError> for AppError {
    fn from(error: diesel_async::pooled_connection::bb8::RunError) -> Self {
        AppError::ConnectionPool {
            source: anyhow::Error::from(error),
        }
    }
}

impl From<diesel_async::pooled_connection::PoolError> for AppError {
    fn from(error: diesel_async::pooled_connection::PoolError) -> Self {
        AppError::ConnectionPool {
            source: anyhow::Error::from(error),
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let detail = errors
            .field_errors()
            .into_iter()
            .next()
            .map(|(field, errors)| {
                let reason = errors
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "invalid value".to_string());
                (field.to_string(), reason)
            });
        match detail {
            Some((field, reason)) => AppError::Validation { field, reason },
            None => AppError::BadRequest {
                message: "Validation failed".to_string(),
            },
        }
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(error: argon2::password_hash::Error) -> Self {
        AppError::Internal {
            source: anyhow::anyhow!("Password hashing failed: {}", error),
        }
    }
}

impl From<argon2::password_hash::phc::Error> for AppError {
    fn from(error: argon2::password_hash::phc::Error) -> Self {
        AppError::Internal {
            source: anyhow::anyhow!("Password hashing failed: {}", error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
