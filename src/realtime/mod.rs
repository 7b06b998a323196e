//! Real-time event broadcasting.
//!
//! A thin fan-out over a tokio broadcast channel. Delivery is best-effort
//! and at-most-once per connected observer; there is no replay for
//! observers that connect later, and lagged receivers simply skip ahead.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::models::SlotStatus;

/// Channel depth before slow observers start losing events.
const CHANNEL_CAPACITY: usize = 256;

/// State-change events pushed to connected clients after a booking
/// operation commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum BookingEvent {
    /// A slot's claim state changed (claimed, released, or overwritten).
    #[serde(rename = "availabilityChanged")]
    AvailabilityChanged {
        availability_id: i32,
        status: SlotStatus,
    },
    /// A new slot was published for an offering.
    #[serde(rename = "availabilityAdded")]
    AvailabilityAdded {
        offering_id: i32,
        availability_id: i32,
    },
    #[serde(rename = "reservationCompleted")]
    ReservationCompleted { reservation_id: i32 },
    #[serde(rename = "reservationRemoved")]
    ReservationRemoved { reservation_id: i32 },
    /// A temporary role grant was revoked by the sweep.
    #[serde(rename = "roleRevoked")]
    RoleRevoked { user_id: i32, role: String },
}

/// Cloneable handle publishing events to all current subscribers.
#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<BookingEvent>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publishes an event. A send with zero subscribers is not an error;
    /// broadcasting is always best-effort.
    pub fn publish(&self, event: BookingEvent) {
        let receivers = self.tx.receiver_count();
        if let Err(e) = self.tx.send(event) {
            tracing::debug!(error = %e, "No subscribers for booking event");
        } else {
            tracing::debug!(receivers, "Booking event published");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_to_all_current_subscribers() {
        let hub = EventBroadcaster::new();
        let mut rx1 = hub.subscribe();
        let mut rx2 = hub.subscribe();

        hub.publish(BookingEvent::ReservationCompleted { reservation_id: 7 });

        assert_eq!(
            rx1.recv().await.unwrap(),
            BookingEvent::ReservationCompleted { reservation_id: 7 }
        );
        assert_eq!(
            rx2.recv().await.unwrap(),
            BookingEvent::ReservationCompleted { reservation_id: 7 }
        );
    }

    #[tokio::test]
    async fn late_subscribers_see_no_backlog() {
        let hub = EventBroadcaster::new();
        {
            let _early = hub.subscribe();
            hub.publish(BookingEvent::ReservationRemoved { reservation_id: 1 });
        }

        let mut late = hub.subscribe();
        hub.publish(BookingEvent::ReservationRemoved { reservation_id: 2 });

        assert_eq!(
            late.recv().await.unwrap(),
            BookingEvent::ReservationRemoved { reservation_id: 2 }
        );
        assert!(late.try_recv().is_err());
    }

    #[test]
    fn publish_without_subscribers_does_not_panic() {
        let hub = EventBroadcaster::new();
        hub.publish(BookingEvent::RoleRevoked {
            user_id: 3,
            role: "admin".to_string(),
        });
    }

    #[test]
    fn events_serialize_with_legacy_names() {
        let event = BookingEvent::AvailabilityChanged {
            availability_id: 12,
            status: SlotStatus::Reserved,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "availabilityChanged");
        assert_eq!(json["availability_id"], 12);
        assert_eq!(json["status"], "reserved");

        let added = BookingEvent::AvailabilityAdded {
            offering_id: 4,
            availability_id: 9,
        };
        let json = serde_json::to_value(&added).unwrap();
        assert_eq!(json["event"], "availabilityAdded");
    }
}
