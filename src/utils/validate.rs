//! Request validation helpers.

use axum::Json;
use axum::extract::{FromRequest, Request, rejection::JsonRejection};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

/// JSON extractor that runs `validator` rules after deserialization.
///
/// Handlers take `ValidatedJson<T>` instead of `Json<T>` for any payload
/// carrying validation attributes; both rejection paths surface as 400s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

static HHMM: OnceLock<Regex> = OnceLock::new();

/// Validator rule for `HH:MM` wall-clock strings (00:00 through 23:59).
pub fn validate_hhmm(value: &str) -> Result<(), ValidationError> {
    let pattern =
        HHMM.get_or_init(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap());
    if pattern.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("time_format")
            .with_message("Expected HH:MM between 00:00 and 23:59".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_times() {
        for time in ["00:00", "09:30", "13:05", "23:59"] {
            assert!(validate_hhmm(time).is_ok(), "{time} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_times() {
        for time in ["24:00", "9:30", "12:60", "12-30", "noon", ""] {
            assert!(validate_hhmm(time).is_err(), "{time} should be rejected");
        }
    }

}
