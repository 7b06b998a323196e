//! Availability (slot) DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Availability, AvailabilityOption, AvailabilitySchedule, SlotStatus};
use crate::repositories::ScheduleEntry;
use crate::utils::validate::validate_hhmm;

/// Request body for publishing a slot.
///
/// For course offerings `max_reservations` sets the claim capacity; for
/// service offerings capacity is fixed at 1 and the creating staff member
/// owns the slot.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateAvailabilityRequest {
    /// ISO datetime, e.g. "2026-03-14T10:00:00"
    pub starts_at: String,
    pub ends_at: String,
    /// Initial status for service slots; defaults to open.
    pub status: Option<SlotStatus>,
    /// Required for course offerings; must be positive.
    pub max_reservations: Option<i32>,
}

/// Administrative status overwrite.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SetSlotStatusRequest {
    pub status: SlotStatus,
}

/// One weekly schedule sub-entry.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate, Clone)]
pub struct ScheduleEntryRequest {
    /// 0 = Monday through 6 = Sunday
    #[validate(range(min = 0, max = 6, message = "Weekday must be between 0 (Monday) and 6 (Sunday)"))]
    pub weekday: i16,
    /// "HH:MM"
    #[validate(custom(function = validate_hhmm))]
    pub starts_at: String,
    #[validate(custom(function = validate_hhmm))]
    pub ends_at: String,
}

impl ScheduleEntryRequest {
    pub fn into_entry(self) -> ScheduleEntry {
        ScheduleEntry {
            weekday: self.weekday,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        }
    }
}

/// Request body for attaching schedule sub-entries to a slot.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AttachScheduleRequest {
    #[validate(length(min = 1, message = "At least one schedule entry is required"), nested)]
    pub entries: Vec<ScheduleEntryRequest>,
}

/// Request body for snapshotting an add-on option onto a slot.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AttachOptionRequest {
    pub option_id: i32,
}

/// Schedule sub-entry as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleResponse {
    pub id: i32,
    pub weekday: i16,
    pub starts_at: String,
    pub ends_at: String,
}

impl From<AvailabilitySchedule> for ScheduleResponse {
    fn from(schedule: AvailabilitySchedule) -> Self {
        Self {
            id: schedule.id,
            weekday: schedule.weekday,
            starts_at: schedule.starts_at,
            ends_at: schedule.ends_at,
        }
    }
}

/// Slot data with its schedule entries.
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub id: i32,
    pub offering_id: i32,
    pub staff_id: Option<i32>,
    pub starts_at: String,
    pub ends_at: String,
    pub capacity: i32,
    pub reserved_count: i32,
    pub status: SlotStatus,
    pub schedules: Vec<ScheduleResponse>,
}

impl AvailabilityResponse {
    pub fn from_slot(slot: Availability, schedules: Vec<AvailabilitySchedule>) -> Self {
        Self {
            id: slot.id,
            offering_id: slot.offering_id,
            staff_id: slot.staff_id,
            starts_at: slot.starts_at.to_jiff().to_string(),
            ends_at: slot.ends_at.to_jiff().to_string(),
            capacity: slot.capacity,
            reserved_count: slot.reserved_count,
            status: slot.status,
            schedules: schedules.into_iter().map(ScheduleResponse::from).collect(),
        }
    }
}

impl From<Availability> for AvailabilityResponse {
    fn from(slot: Availability) -> Self {
        Self::from_slot(slot, Vec::new())
    }
}

/// Option snapshot attached to a slot.
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityOptionResponse {
    pub id: i32,
    pub availability_id: i32,
    pub option_id: i32,
    /// Price at the time the option was attached.
    pub price: String,
}

impl From<AvailabilityOption> for AvailabilityOptionResponse {
    fn from(option: AvailabilityOption) -> Self {
        Self {
            id: option.id,
            availability_id: option.availability_id,
            option_id: option.option_id,
            price: option.price.to_string(),
        }
    }
}
