//! Availability manager: lifecycle of bookable slots.
//!
//! Creation, enumeration, status overwrites, schedule sub-entries, and
//! option snapshots. Claim-state mutation is NOT here — that belongs to the
//! reservation engine, which owns the capacity invariant.

use jiff::civil;
use jiff_diesel::ToDiesel;

use crate::error::{AppError, AppResult};
use crate::models::{
    Availability, AvailabilityOption, AvailabilitySchedule, NewAvailability,
    NewAvailabilityOption, NewAvailabilitySchedule, SlotStatus,
};
use crate::realtime::{BookingEvent, EventBroadcaster};
use crate::repositories::{AvailabilityRepository, OfferingRepository, ScheduleEntry};

#[derive(Clone)]
pub struct AvailabilityService {
    repo: AvailabilityRepository,
    offerings: OfferingRepository,
    broadcaster: EventBroadcaster,
}

impl AvailabilityService {
    pub fn new(
        repo: AvailabilityRepository,
        offerings: OfferingRepository,
        broadcaster: EventBroadcaster,
    ) -> Self {
        Self {
            repo,
            offerings,
            broadcaster,
        }
    }

    /// Creates a single-provider slot (capacity 1).
    ///
    /// No overlap validation against existing slots is performed; staff are
    /// trusted to manage their own calendars.
    pub async fn create_slot(
        &self,
        staff_id: i32,
        offering_id: i32,
        starts_at: civil::DateTime,
        ends_at: civil::DateTime,
        initial_status: SlotStatus,
    ) -> AppResult<Availability> {
        self.validate_window(starts_at, ends_at)?;
        self.require_offering(offering_id).await?;

        let slot = self
            .repo
            .create(NewAvailability {
                offering_id,
                staff_id: Some(staff_id),
                starts_at: starts_at.to_diesel(),
                ends_at: ends_at.to_diesel(),
                capacity: 1,
                status: initial_status,
            })
            .await?;

        self.broadcaster.publish(BookingEvent::AvailabilityAdded {
            offering_id,
            availability_id: slot.id,
        });
        Ok(slot)
    }

    /// Creates a capacity-based slot (course session).
    pub async fn create_capacity_slot(
        &self,
        offering_id: i32,
        starts_at: civil::DateTime,
        ends_at: civil::DateTime,
        max_reservations: i32,
    ) -> AppResult<Availability> {
        if max_reservations <= 0 {
            return Err(AppError::Validation {
                field: "max_reservations".to_string(),
                reason: "Capacity must be a positive integer".to_string(),
            });
        }
        self.validate_window(starts_at, ends_at)?;
        self.require_offering(offering_id).await?;

        let slot = self
            .repo
            .create(NewAvailability {
                offering_id,
                staff_id: None,
                starts_at: starts_at.to_diesel(),
                ends_at: ends_at.to_diesel(),
                capacity: max_reservations,
                status: SlotStatus::Open,
            })
            .await?;

        self.broadcaster.publish(BookingEvent::AvailabilityAdded {
            offering_id,
            availability_id: slot.id,
        });
        Ok(slot)
    }

    pub async fn get_slot(&self, id: i32) -> AppResult<Availability> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "availability".to_string(),
                field: "id".to_string(),
                value: id.to_string(),
            })
    }

    /// Slots for an offering with their schedule entries attached.
    pub async fn list_slots(
        &self,
        offering_id: i32,
        status: Option<SlotStatus>,
        limit: Option<i64>,
    ) -> AppResult<Vec<(Availability, Vec<AvailabilitySchedule>)>> {
        self.require_offering(offering_id).await?;
        let slots = self.repo.list_for_offering(offering_id, status, limit).await?;

        let mut detailed = Vec::with_capacity(slots.len());
        for slot in slots {
            let schedules = self.repo.list_schedules(slot.id).await?;
            detailed.push((slot, schedules));
        }
        Ok(detailed)
    }

    /// Administrative status overwrite. Idempotent; any status may be set
    /// from any other, so callers are responsible for invariants.
    pub async fn set_status(&self, id: i32, status: SlotStatus) -> AppResult<Availability> {
        let slot = self
            .repo
            .set_status(id, status)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "availability".to_string(),
                field: "id".to_string(),
                value: id.to_string(),
            })?;

        self.broadcaster.publish(BookingEvent::AvailabilityChanged {
            availability_id: slot.id,
            status: slot.status,
        });
        Ok(slot)
    }

    /// Attaches all schedule entries in one transaction; a failing entry
    /// rolls back the batch.
    pub async fn attach_schedule(
        &self,
        availability_id: i32,
        entries: Vec<ScheduleEntry>,
    ) -> AppResult<Vec<AvailabilitySchedule>> {
        self.get_slot(availability_id).await?;
        let rows = entries
            .into_iter()
            .map(|entry| NewAvailabilitySchedule {
                availability_id,
                weekday: entry.weekday,
                starts_at: entry.starts_at,
                ends_at: entry.ends_at,
            })
            .collect();
        self.repo.attach_schedule(rows).await
    }

    pub async fn list_schedules(
        &self,
        availability_id: i32,
    ) -> AppResult<Vec<AvailabilitySchedule>> {
        self.get_slot(availability_id).await?;
        self.repo.list_schedules(availability_id).await
    }

    /// Attaches an option to a slot, snapshotting the option's current
    /// price. The option must belong to the slot's offering.
    pub async fn attach_option(
        &self,
        availability_id: i32,
        option_id: i32,
    ) -> AppResult<AvailabilityOption> {
        let slot = self.get_slot(availability_id).await?;
        let option = self
            .offerings
            .find_option(option_id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "offering_option".to_string(),
                field: "id".to_string(),
                value: option_id.to_string(),
            })?;

        if option.offering_id != slot.offering_id {
            return Err(AppError::Validation {
                field: "option_id".to_string(),
                reason: "Option belongs to a different offering".to_string(),
            });
        }

        self.repo
            .attach_option(NewAvailabilityOption {
                availability_id,
                option_id,
                price: option.price,
            })
            .await
    }

    pub async fn detach_option(&self, availability_id: i32, option_id: i32) -> AppResult<bool> {
        let affected = self.repo.detach_option(availability_id, option_id).await?;
        Ok(affected > 0)
    }

    pub async fn list_options(&self, availability_id: i32) -> AppResult<Vec<AvailabilityOption>> {
        self.get_slot(availability_id).await?;
        self.repo.list_options(availability_id).await
    }

    /// Deletes a slot and everything referencing it.
    pub async fn delete_slot(&self, id: i32) -> AppResult<()> {
        if !self.repo.delete_cascading(id).await? {
            return Err(AppError::NotFound {
                entity: "availability".to_string(),
                field: "id".to_string(),
                value: id.to_string(),
            });
        }
        Ok(())
    }

    async fn require_offering(&self, offering_id: i32) -> AppResult<()> {
        self.offerings
            .find_by_id(offering_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound {
                entity: "offering".to_string(),
                field: "id".to_string(),
                value: offering_id.to_string(),
            })
    }

    fn validate_window(&self, starts_at: civil::DateTime, ends_at: civil::DateTime) -> AppResult<()> {
        if ends_at <= starts_at {
            return Err(AppError::Validation {
                field: "ends_at".to_string(),
                reason: "End of the slot must be after its start".to_string(),
            });
        }
        Ok(())
    }
}
