//! Reservation DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::availability::ScheduleEntryRequest;
use crate::models::{Reservation, ReservationSchedule, ReservationStatus};
use crate::repositories::ReservationDetail;

/// Request body for a bare reservation.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateReservationRequest {
    pub availability_id: i32,
    /// Decimal amount as a string; defaults to the offering's price.
    pub price: Option<String>,
}

/// Request body for reserving with an uploaded proof of payment.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ReserveWithProofRequest {
    /// Reference to the stored proof document.
    #[validate(length(min = 1, max = 512, message = "Proof reference is required"))]
    pub proof_reference: String,
    /// Decimal amount as a string; required in this flow.
    #[validate(length(min = 1, message = "Price is required"))]
    pub price: String,
    /// Option names in selection order.
    #[serde(default)]
    pub selected_option_names: Vec<String>,
}

/// Request body for a course reservation with weekly schedule entries.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CourseReservationRequest {
    pub status: Option<ReservationStatus>,
    pub contact_name: Option<String>,
    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[validate(length(min = 1, message = "At least one schedule entry is required"), nested)]
    pub schedule: Vec<ScheduleEntryRequest>,
}

/// Request body for the staff status transition (completed or pending).
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateReservationStatusRequest {
    pub status: ReservationStatus,
}

/// One selected add-on as stored at reservation time.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SelectedOptionResponse {
    pub name: String,
    pub price: String,
}

/// A schedule sub-entry booked with a course reservation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationScheduleResponse {
    pub weekday: i16,
    pub starts_at: String,
    pub ends_at: String,
}

impl From<ReservationSchedule> for ReservationScheduleResponse {
    fn from(schedule: ReservationSchedule) -> Self {
        Self {
            weekday: schedule.weekday,
            starts_at: schedule.starts_at,
            ends_at: schedule.ends_at,
        }
    }
}

/// Reservation data as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationResponse {
    pub id: i32,
    pub availability_id: i32,
    pub user_id: i32,
    pub status: ReservationStatus,
    pub price: String,
    pub proof_reference: Option<String>,
    pub selected_options: Vec<SelectedOptionResponse>,
    pub slot_starts_at: Option<String>,
    pub slot_ends_at: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: String,
    pub schedules: Vec<ReservationScheduleResponse>,
}

impl ReservationResponse {
    pub fn from_reservation(
        reservation: Reservation,
        schedules: Vec<ReservationSchedule>,
    ) -> Self {
        let selected_options = reservation
            .options()
            .into_iter()
            .map(|option| SelectedOptionResponse {
                name: option.name,
                price: option.price.to_string(),
            })
            .collect();

        Self {
            id: reservation.id,
            availability_id: reservation.availability_id,
            user_id: reservation.user_id,
            status: reservation.status,
            price: reservation.price.to_string(),
            proof_reference: reservation.proof_reference,
            selected_options,
            slot_starts_at: reservation.slot_starts_at.map(|dt| dt.to_jiff().to_string()),
            slot_ends_at: reservation.slot_ends_at.map(|dt| dt.to_jiff().to_string()),
            contact_name: reservation.contact_name,
            contact_email: reservation.contact_email,
            contact_phone: reservation.contact_phone,
            created_at: reservation.created_at.to_jiff().to_string(),
            schedules: schedules
                .into_iter()
                .map(ReservationScheduleResponse::from)
                .collect(),
        }
    }
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self::from_reservation(reservation, Vec::new())
    }
}

/// Reservation with the reserving user's name and offering title.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDetailResponse {
    #[serde(flatten)]
    pub reservation: ReservationResponse,
    pub user_name: String,
    pub offering_title: String,
}

impl ReservationDetailResponse {
    pub fn from_detail(detail: ReservationDetail, schedules: Vec<ReservationSchedule>) -> Self {
        Self {
            reservation: ReservationResponse::from_reservation(detail.reservation, schedules),
            user_name: detail.user_name,
            offering_title: detail.offering_title,
        }
    }
}
