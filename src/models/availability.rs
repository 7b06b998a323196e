use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use jiff_diesel::DateTime;
use serde::{Deserialize, Serialize};

/// Derived slot status. A slot is `reserved` exactly when its capacity is
/// exhausted (`reserved_count == capacity`); the claim and release
/// operations are the only writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema, DbEnum)]
#[db_enum(existing_type_path = "crate::schema::sql_types::SlotStatus")]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Open,
    Reserved,
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotStatus::Open => write!(f, "open"),
            SlotStatus::Reserved => write!(f, "reserved"),
        }
    }
}

/// A bookable time window with a claim capacity.
///
/// Capacity 1 models a single-provider service slot (binary lock);
/// capacity N models a course session (counting lock).
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::availabilities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Availability {
    pub id: i32,
    pub offering_id: i32,
    pub staff_id: Option<i32>,
    pub starts_at: DateTime,
    pub ends_at: DateTime,
    pub capacity: i32,
    pub reserved_count: i32,
    pub status: SlotStatus,
    pub created_at: DateTime,
}

impl Availability {
    /// True while at least one capacity unit is unclaimed.
    pub fn is_claimable(&self) -> bool {
        self.reserved_count < self.capacity
    }
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::availabilities)]
pub struct NewAvailability {
    pub offering_id: i32,
    pub staff_id: Option<i32>,
    pub starts_at: DateTime,
    pub ends_at: DateTime,
    pub capacity: i32,
    pub status: SlotStatus,
}

/// Weekly schedule sub-entry attached to a course-style slot.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::availability_schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AvailabilitySchedule {
    pub id: i32,
    pub availability_id: i32,
    pub weekday: i16,
    pub starts_at: String,
    pub ends_at: String,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::availability_schedules)]
pub struct NewAvailabilitySchedule {
    pub availability_id: i32,
    pub weekday: i16,
    pub starts_at: String,
    pub ends_at: String,
}

/// Join row between a slot and a selectable add-on, carrying the price the
/// option had when it was attached (decoupled from later price edits).
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::availability_options)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AvailabilityOption {
    pub id: i32,
    pub availability_id: i32,
    pub option_id: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::availability_options)]
pub struct NewAvailabilityOption {
    pub availability_id: i32,
    pub option_id: i32,
    pub price: BigDecimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff_diesel::ToDiesel;

    fn slot(capacity: i32, reserved_count: i32) -> Availability {
        let ts = jiff::civil::date(2026, 3, 14).at(10, 0, 0, 0);
        Availability {
            id: 1,
            offering_id: 1,
            staff_id: None,
            starts_at: ts.to_diesel(),
            ends_at: ts.to_diesel(),
            capacity,
            reserved_count,
            status: SlotStatus::Open,
            created_at: ts.to_diesel(),
        }
    }

    #[test]
    fn single_slot_claimable_until_first_claim() {
        assert!(slot(1, 0).is_claimable());
        assert!(!slot(1, 1).is_claimable());
    }

    #[test]
    fn counting_slot_claimable_below_capacity() {
        assert!(slot(3, 2).is_claimable());
        assert!(!slot(3, 3).is_claimable());
    }
}
