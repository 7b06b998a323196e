//! Reservation engine.
//!
//! Enforces the at-most-`capacity` claims invariant, drives the reservation
//! state machine, and coordinates slot state, real-time events, and
//! notification emails. All claim/release writes happen inside repository
//! transactions; this layer sequences them and maps outcomes to domain
//! errors.

use bigdecimal::BigDecimal;
use jiff::civil;
use jiff_diesel::ToDiesel;
use serde_json::json;

use crate::config::BookingConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    NewReservation, Reservation, ReservationSchedule, ReservationStatus, SelectedOption,
};
use crate::realtime::{BookingEvent, EventBroadcaster};
use crate::repositories::{
    AvailabilityRepository, OfferingRepository, ReservationDetail, ReservationRepository,
    ScheduleEntry, UserRepository,
};
use crate::services::notifications::NotificationService;

/// Cash-register close-out over a date range: completed and pending
/// reservations counted and totalled separately, with the itemized rows.
#[derive(Debug)]
pub struct ReservationSummary {
    pub completed_count: usize,
    pub completed_total: BigDecimal,
    pub completed: Vec<ReservationDetail>,
    pub pending_count: usize,
    pub pending_total: BigDecimal,
    pub pending: Vec<ReservationDetail>,
}

#[derive(Clone)]
pub struct ReservationService {
    repo: ReservationRepository,
    availabilities: AvailabilityRepository,
    offerings: OfferingRepository,
    users: UserRepository,
    config: BookingConfig,
    broadcaster: EventBroadcaster,
    notifications: NotificationService,
}

impl ReservationService {
    pub fn new(
        repo: ReservationRepository,
        availabilities: AvailabilityRepository,
        offerings: OfferingRepository,
        users: UserRepository,
        config: BookingConfig,
        broadcaster: EventBroadcaster,
        notifications: NotificationService,
    ) -> Self {
        Self {
            repo,
            availabilities,
            offerings,
            users,
            config,
            broadcaster,
            notifications,
        }
    }

    /// The canonical claimability predicate for both slot variants:
    /// `reserved_count < capacity`. Unknown ids read as not claimable.
    ///
    /// Advisory only — the claim itself re-checks atomically, so this can
    /// be used for UI state without creating a check-then-act gap.
    pub async fn can_reserve(&self, availability_id: i32) -> AppResult<bool> {
        Ok(self
            .availabilities
            .find_by_id(availability_id)
            .await?
            .map(|slot| slot.is_claimable())
            .unwrap_or(false))
    }

    /// Claims a slot and creates a pending reservation.
    ///
    /// With no explicit price the offering's current price is charged.
    /// The losing side of a concurrent claim observes `SlotConflict` (or
    /// `CapacityExceeded` for counting slots), never a double-claim.
    pub async fn reserve(
        &self,
        user_id: i32,
        availability_id: i32,
        price: Option<BigDecimal>,
    ) -> AppResult<Reservation> {
        let price = match price {
            Some(price) => price,
            None => self.offering_price(availability_id).await?,
        };

        let (reservation, slot) = self
            .repo
            .create_claiming(
                NewReservation::pending(availability_id, user_id, price),
                Vec::new(),
                false,
            )
            .await?;

        self.broadcaster.publish(BookingEvent::AvailabilityChanged {
            availability_id: slot.id,
            status: slot.status,
        });
        Ok(reservation)
    }

    /// Proof-of-payment flow: re-validates claimability, snapshots the
    /// slot's time bounds and the selected add-ons onto the reservation,
    /// and claims the slot, all atomically. Fires confirmation emails off
    /// the critical path.
    pub async fn reserve_with_proof(
        &self,
        user_id: i32,
        availability_id: i32,
        proof_reference: String,
        price: BigDecimal,
        selected_option_names: Vec<String>,
    ) -> AppResult<Reservation> {
        let slot = self
            .availabilities
            .find_by_id(availability_id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "availability".to_string(),
                field: "id".to_string(),
                value: availability_id.to_string(),
            })?;

        let selected = self
            .offerings
            .options_by_names(slot.offering_id, &selected_option_names)
            .await?
            .into_iter()
            .map(|option| SelectedOption {
                name: option.name,
                price: option.price,
            })
            .collect::<Vec<_>>();

        let mut new_reservation = NewReservation::pending(availability_id, user_id, price);
        new_reservation.proof_reference = Some(proof_reference);
        new_reservation.selected_options = Some(json!(selected));

        let (reservation, slot) = self
            .repo
            .create_claiming(new_reservation, Vec::new(), true)
            .await?;

        self.broadcaster.publish(BookingEvent::AvailabilityChanged {
            availability_id: slot.id,
            status: slot.status,
        });

        // Fire-and-forget emails; failures are logged inside the service.
        if let Some(user) = self.users.find_by_id(user_id).await? {
            self.notifications
                .reservation_received(&user.email, &user.username);
        }
        if let Some(staff_id) = slot.staff_id {
            if let (Some(staff), Some(offering)) = (
                self.users.find_by_id(staff_id).await?,
                self.offerings.find_by_id(slot.offering_id).await?,
            ) {
                self.notifications.staff_new_reservation(
                    &staff.email,
                    &staff.username,
                    &offering.title,
                );
            }
        }

        Ok(reservation)
    }

    /// Course flow: capacity check, reservation insert, and all schedule
    /// sub-entries in one transaction. The (capacity+1)-th concurrent
    /// attempt fails with `CapacityExceeded`.
    #[allow(clippy::too_many_arguments)]
    pub async fn reserve_course_with_schedule(
        &self,
        availability_id: i32,
        user_id: i32,
        status: ReservationStatus,
        contact_name: Option<String>,
        contact_email: Option<String>,
        contact_phone: Option<String>,
        schedule: Vec<ScheduleEntry>,
    ) -> AppResult<(Reservation, Vec<ReservationSchedule>)> {
        let price = self.offering_price(availability_id).await?;

        let mut new_reservation = NewReservation::pending(availability_id, user_id, price);
        new_reservation.status = status;
        new_reservation.contact_name = contact_name;
        new_reservation.contact_email = contact_email;
        new_reservation.contact_phone = contact_phone;

        let (reservation, slot) = self
            .repo
            .create_claiming(new_reservation, schedule, false)
            .await?;

        self.broadcaster.publish(BookingEvent::AvailabilityChanged {
            availability_id: slot.id,
            status: slot.status,
        });

        let schedules = self.repo.list_schedules(reservation.id).await?;
        Ok((reservation, schedules))
    }

    pub async fn get_reservation(&self, id: i32) -> AppResult<Reservation> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "reservation".to_string(),
                field: "id".to_string(),
                value: id.to_string(),
            })
    }

    /// Finalizes a reservation. Idempotent: completing twice leaves the
    /// same observable state. The owning slot was already marked at claim
    /// time, so no slot write is needed here.
    pub async fn complete(&self, id: i32) -> AppResult<Reservation> {
        let reservation = self.set_status(id, ReservationStatus::Completed).await?;

        self.broadcaster.publish(BookingEvent::ReservationCompleted {
            reservation_id: reservation.id,
        });

        if let Some(user) = self.users.find_by_id(reservation.user_id).await? {
            self.notifications
                .reservation_completed(&user.email, &user.username);
        }

        Ok(reservation)
    }

    /// Reverts the status field only. Deliberately does NOT release the
    /// slot: un-completing is a bookkeeping correction, and the claim
    /// stays consumed until the reservation is deleted.
    pub async fn mark_pending(&self, id: i32) -> AppResult<Reservation> {
        self.set_status(id, ReservationStatus::Pending).await
    }

    /// Removes a reservation and its schedule entries. Whether the claimed
    /// capacity is handed back is the `booking.release_on_delete` policy;
    /// with it off, a deleted reservation leaves the slot consumed, as the
    /// legacy system did.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let (reservation, released_slot) = self
            .repo
            .delete(id, self.config.release_on_delete)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "reservation".to_string(),
                field: "id".to_string(),
                value: id.to_string(),
            })?;

        self.broadcaster.publish(BookingEvent::ReservationRemoved {
            reservation_id: reservation.id,
        });
        if let Some(slot) = released_slot {
            self.broadcaster.publish(BookingEvent::AvailabilityChanged {
                availability_id: slot.id,
                status: slot.status,
            });
        }

        Ok(())
    }

    /// A user's reservations with offering titles and schedule entries.
    pub async fn list_for_user(
        &self,
        user_id: i32,
    ) -> AppResult<Vec<(ReservationDetail, Vec<ReservationSchedule>)>> {
        let details = self.repo.list_for_user(user_id).await?;
        self.with_schedules(details).await
    }

    /// All reservations against one offering, for staff views.
    pub async fn list_for_offering(
        &self,
        offering_id: i32,
    ) -> AppResult<Vec<(ReservationDetail, Vec<ReservationSchedule>)>> {
        let details = self.repo.list_for_offering(offering_id).await?;
        self.with_schedules(details).await
    }

    /// Close-out summary over an inclusive calendar-day range.
    pub async fn summarize(
        &self,
        start_date: civil::Date,
        end_date: civil::Date,
    ) -> AppResult<ReservationSummary> {
        if end_date < start_date {
            return Err(AppError::Validation {
                field: "end_date".to_string(),
                reason: "End date must not precede start date".to_string(),
            });
        }

        let from = start_date.at(0, 0, 0, 0);
        let to = end_date.at(23, 59, 59, 999_999_999);
        let details = self
            .repo
            .list_created_between(from.to_diesel(), to.to_diesel())
            .await?;

        Ok(summarize_details(details))
    }

    async fn set_status(&self, id: i32, status: ReservationStatus) -> AppResult<Reservation> {
        self.repo
            .set_status(id, status)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "reservation".to_string(),
                field: "id".to_string(),
                value: id.to_string(),
            })
    }

    async fn with_schedules(
        &self,
        details: Vec<ReservationDetail>,
    ) -> AppResult<Vec<(ReservationDetail, Vec<ReservationSchedule>)>> {
        let mut rows = Vec::with_capacity(details.len());
        for detail in details {
            let schedules = self.repo.list_schedules(detail.reservation.id).await?;
            rows.push((detail, schedules));
        }
        Ok(rows)
    }

    async fn offering_price(&self, availability_id: i32) -> AppResult<BigDecimal> {
        let slot = self
            .availabilities
            .find_by_id(availability_id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "availability".to_string(),
                field: "id".to_string(),
                value: availability_id.to_string(),
            })?;
        let offering = self
            .offerings
            .find_by_id(slot.offering_id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "offering".to_string(),
                field: "id".to_string(),
                value: slot.offering_id.to_string(),
            })?;
        Ok(offering.price)
    }
}

/// Splits detail rows by status and accumulates exact decimal totals.
/// Pure so the aggregation arithmetic is testable without a database.
fn summarize_details(details: Vec<ReservationDetail>) -> ReservationSummary {
    let mut summary = ReservationSummary {
        completed_count: 0,
        completed_total: BigDecimal::from(0),
        completed: Vec::new(),
        pending_count: 0,
        pending_total: BigDecimal::from(0),
        pending: Vec::new(),
    };

    for detail in details {
        match detail.reservation.status {
            ReservationStatus::Completed => {
                summary.completed_count += 1;
                summary.completed_total += detail.reservation.price.clone();
                summary.completed.push(detail);
            }
            ReservationStatus::Pending => {
                summary.pending_count += 1;
                summary.pending_total += detail.reservation.price.clone();
                summary.pending.push(detail);
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn detail(id: i32, status: ReservationStatus, price: &str) -> ReservationDetail {
        let ts = jiff::civil::date(2026, 5, 2).at(9, 0, 0, 0);
        ReservationDetail {
            reservation: Reservation {
                id,
                availability_id: 1,
                user_id: 1,
                status,
                price: BigDecimal::from_str(price).unwrap(),
                proof_reference: None,
                selected_options: None,
                slot_starts_at: None,
                slot_ends_at: None,
                contact_name: None,
                contact_email: None,
                contact_phone: None,
                created_at: ts.to_diesel(),
            },
            user_name: "ana".to_string(),
            offering_title: "Manicure".to_string(),
        }
    }

    #[test]
    fn summary_totals_split_by_status() {
        let summary = summarize_details(vec![
            detail(1, ReservationStatus::Completed, "1500.50"),
            detail(2, ReservationStatus::Pending, "200.10"),
            detail(3, ReservationStatus::Completed, "99.50"),
            detail(4, ReservationStatus::Pending, "0.90"),
        ]);

        assert_eq!(summary.completed_count, 2);
        assert_eq!(
            summary.completed_total,
            BigDecimal::from_str("1600.00").unwrap()
        );
        assert_eq!(summary.pending_count, 2);
        assert_eq!(summary.pending_total, BigDecimal::from_str("201.00").unwrap());
        assert_eq!(summary.completed.len(), 2);
        assert_eq!(summary.pending.len(), 2);
    }

    #[test]
    fn summary_of_empty_range_is_zero() {
        let summary = summarize_details(Vec::new());
        assert_eq!(summary.completed_count, 0);
        assert_eq!(summary.completed_total, BigDecimal::from(0));
        assert_eq!(summary.pending_count, 0);
        assert_eq!(summary.pending_total, BigDecimal::from(0));
    }

    #[test]
    fn decimal_accumulation_does_not_drift() {
        // 0.10 summed ten times must be exactly 1.00, which float
        // accumulation does not guarantee.
        let details: Vec<_> = (0..10)
            .map(|i| detail(i, ReservationStatus::Completed, "0.10"))
            .collect();
        let summary = summarize_details(details);
        assert_eq!(summary.completed_total, BigDecimal::from_str("1.00").unwrap());
    }
}
