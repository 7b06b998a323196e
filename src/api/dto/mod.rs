mod auth;
mod availability;
mod error;
mod offering;
mod reservation;
mod summary;
mod user;

pub use auth::{LoginRequest, RefreshRequest, RegisterRequest, TokenResponse};
pub use availability::{
    AttachOptionRequest, AttachScheduleRequest, AvailabilityOptionResponse, AvailabilityResponse,
    CreateAvailabilityRequest, ScheduleEntryRequest, ScheduleResponse, SetSlotStatusRequest,
};
pub use error::ErrorResponse;
pub use offering::{
    CreateOfferingRequest, CreateOptionRequest, OfferingOptionResponse, OfferingResponse,
    UpdateOfferingRequest, UpdateOptionRequest, UpdatePriceRequest,
};
pub use reservation::{
    CourseReservationRequest, CreateReservationRequest, ReservationDetailResponse,
    ReservationResponse, ReservationScheduleResponse, ReserveWithProofRequest,
    SelectedOptionResponse, UpdateReservationStatusRequest,
};
pub use summary::{SummaryQuery, SummaryResponse};
pub use user::{AssignRoleRequest, RolesResponse, UserResponse};

use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::error::AppError;

/// Parses a decimal money amount from its wire representation.
///
/// Prices travel as strings so they survive JSON number round-trips
/// unrounded; "1500.50" must come back as exactly 1500.50.
pub(crate) fn parse_price(raw: &str) -> Result<BigDecimal, AppError> {
    let price = BigDecimal::from_str(raw.trim()).map_err(|_| AppError::Validation {
        field: "price".to_string(),
        reason: format!("'{}' is not a valid decimal amount", raw),
    })?;
    if price < BigDecimal::from(0) {
        return Err(AppError::Validation {
            field: "price".to_string(),
            reason: "Price must not be negative".to_string(),
        });
    }
    Ok(price)
}

/// Parses an ISO-8601 civil datetime ("2026-03-14T10:00:00").
pub(crate) fn parse_datetime(raw: &str, field: &str) -> Result<jiff::civil::DateTime, AppError> {
    raw.parse().map_err(|_| AppError::Validation {
        field: field.to_string(),
        reason: format!("'{}' is not a valid datetime (expected YYYY-MM-DDTHH:MM:SS)", raw),
    })
}

/// Parses a calendar date ("2026-03-14").
pub(crate) fn parse_date(raw: &str, field: &str) -> Result<jiff::civil::Date, AppError> {
    raw.parse().map_err(|_| AppError::Validation {
        field: field.to_string(),
        reason: format!("'{}' is not a valid date (expected YYYY-MM-DD)", raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_price_keeps_decimal_digits() {
        let price = parse_price("1500.50").unwrap();
        assert_eq!(price.to_string(), "1500.50");
    }

    #[test]
    fn parse_price_rejects_garbage_and_negatives() {
        assert!(parse_price("abc").is_err());
        assert!(parse_price("-1").is_err());
        assert!(parse_price("").is_err());
    }

    #[test]
    fn parse_datetime_accepts_iso() {
        let dt = parse_datetime("2026-03-14T10:30:00", "starts_at").unwrap();
        assert_eq!(dt, jiff::civil::date(2026, 3, 14).at(10, 30, 0, 0));
    }

    #[test]
    fn parse_date_rejects_timestamps() {
        assert!(parse_date("2026-03-14T10:30:00", "start_date").is_err());
        assert!(parse_date("2026-03-14", "start_date").is_ok());
    }
}
