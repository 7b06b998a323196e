use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use jiff_diesel::DateTime;
use serde::{Deserialize, Serialize};

/// Reservation state machine: `pending` -> `completed` (terminal) or
/// `pending` -> deleted (terminal). Marking a completed reservation back to
/// pending is a staff bookkeeping correction, not a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema, DbEnum)]
#[db_enum(existing_type_path = "crate::schema::sql_types::ReservationStatus")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Completed,
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationStatus::Pending => write!(f, "pending"),
            ReservationStatus::Completed => write!(f, "completed"),
        }
    }
}

/// One selected add-on, captured at reservation time. The ordered list is
/// stored as JSONB on the reservation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SelectedOption {
    pub name: String,
    #[schema(value_type = String)]
    pub price: BigDecimal,
}

/// A user's claim against one availability.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::reservations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Reservation {
    pub id: i32,
    pub availability_id: i32,
    pub user_id: i32,
    pub status: ReservationStatus,
    pub price: BigDecimal,
    pub proof_reference: Option<String>,
    pub selected_options: Option<serde_json::Value>,
    pub slot_starts_at: Option<DateTime>,
    pub slot_ends_at: Option<DateTime>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: DateTime,
}

impl Reservation {
    /// Deserializes the stored option selection, preserving order.
    /// A row without options yields an empty list.
    pub fn options(&self) -> Vec<SelectedOption> {
        self.selected_options
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::reservations)]
pub struct NewReservation {
    pub availability_id: i32,
    pub user_id: i32,
    pub status: ReservationStatus,
    pub price: BigDecimal,
    pub proof_reference: Option<String>,
    pub selected_options: Option<serde_json::Value>,
    pub slot_starts_at: Option<DateTime>,
    pub slot_ends_at: Option<DateTime>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

impl NewReservation {
    /// A bare pending reservation, as created by the plain reserve flow.
    pub fn pending(availability_id: i32, user_id: i32, price: BigDecimal) -> Self {
        Self {
            availability_id,
            user_id,
            status: ReservationStatus::Pending,
            price,
            proof_reference: None,
            selected_options: None,
            slot_starts_at: None,
            slot_ends_at: None,
            contact_name: None,
            contact_email: None,
            contact_phone: None,
        }
    }
}

/// Booked weekly time sub-range for a course-style reservation.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::reservation_schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReservationSchedule {
    pub id: i32,
    pub reservation_id: i32,
    pub weekday: i16,
    pub starts_at: String,
    pub ends_at: String,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::reservation_schedules)]
pub struct NewReservationSchedule {
    pub reservation_id: i32,
    pub weekday: i16,
    pub starts_at: String,
    pub ends_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff_diesel::ToDiesel;
    use std::str::FromStr;

    #[test]
    fn options_round_trip_preserves_order_and_price() {
        let selected = vec![
            SelectedOption {
                name: "Opción A".to_string(),
                price: BigDecimal::from_str("500.25").unwrap(),
            },
            SelectedOption {
                name: "Opción B".to_string(),
                price: BigDecimal::from_str("1000.25").unwrap(),
            },
        ];
        let ts = jiff::civil::date(2026, 3, 14).at(10, 0, 0, 0);
        let reservation = Reservation {
            id: 1,
            availability_id: 1,
            user_id: 1,
            status: ReservationStatus::Pending,
            price: BigDecimal::from_str("1500.50").unwrap(),
            proof_reference: None,
            selected_options: Some(serde_json::to_value(&selected).unwrap()),
            slot_starts_at: None,
            slot_ends_at: None,
            contact_name: None,
            contact_email: None,
            contact_phone: None,
            created_at: ts.to_diesel(),
        };

        let restored = reservation.options();
        assert_eq!(restored, selected);
        assert_eq!(restored[0].name, "Opción A");
        assert_eq!(restored[1].name, "Opción B");
    }

    #[test]
    fn options_default_to_empty_when_absent() {
        let ts = jiff::civil::date(2026, 3, 14).at(10, 0, 0, 0);
        let reservation = Reservation {
            id: 1,
            availability_id: 1,
            user_id: 1,
            status: ReservationStatus::Completed,
            price: BigDecimal::from(0),
            proof_reference: None,
            selected_options: None,
            slot_starts_at: None,
            slot_ends_at: None,
            contact_name: None,
            contact_email: None,
            contact_phone: None,
            created_at: ts.to_diesel(),
        };
        assert!(reservation.options().is_empty());
    }
}
