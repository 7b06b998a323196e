//! Availability (bookable slot) repository.
//!
//! Owns the claim/release primitives. A slot's `reserved_count` and derived
//! `status` are mutated only here, inside conditional updates, so the
//! at-most-`capacity` invariant holds under concurrent callers without any
//! in-process locking.

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{
    Availability, AvailabilityOption, AvailabilitySchedule, NewAvailability,
    NewAvailabilityOption, NewAvailabilitySchedule, SlotStatus,
};

/// Result of attempting to claim one capacity unit.
#[derive(Debug)]
pub enum ClaimOutcome {
    /// The claim succeeded; carries the slot after the increment.
    Claimed(Availability),
    /// The slot exists but every capacity unit is taken; carries the slot as
    /// it was observed.
    Unavailable(Availability),
    /// No slot with that id.
    NotFound,
}

#[derive(Clone)]
pub struct AvailabilityRepository {
    pool: AsyncDbPool,
}

impl AvailabilityRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_slot: NewAvailability) -> Result<Availability, AppError> {
        use crate::schema::availabilities::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(availabilities)
            .values(&new_slot)
            .returning(Availability::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_by_id(&self, slot_id: i32) -> Result<Option<Availability>, AppError> {
        use crate::schema::availabilities::dsl::*;
        let mut conn = self.pool.get().await?;

        availabilities
            .filter(id.eq(slot_id))
            .select(Availability::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Lists slots for an offering, optionally filtered by status.
    ///
    /// Ordered by start time ascending; descending when a limit is given so
    /// the most recent slots win the cut.
    pub async fn list_for_offering(
        &self,
        offering: i32,
        status_filter: Option<SlotStatus>,
        limit: Option<i64>,
    ) -> Result<Vec<Availability>, AppError> {
        use crate::schema::availabilities::dsl::*;
        let mut conn = self.pool.get().await?;

        let mut query = availabilities
            .filter(offering_id.eq(offering))
            .select(Availability::as_select())
            .into_boxed();

        if let Some(wanted) = status_filter {
            query = query.filter(status.eq(wanted));
        }

        query = match limit {
            Some(max) => query.order(starts_at.desc()).limit(max),
            None => query.order(starts_at.asc()),
        };

        query.load(&mut conn).await.map_err(AppError::from)
    }

    /// Overwrites the slot status. No transition table is enforced; this is
    /// the administrative escape hatch, not part of the claim path.
    pub async fn set_status(
        &self,
        slot_id: i32,
        new_status: SlotStatus,
    ) -> Result<Option<Availability>, AppError> {
        use crate::schema::availabilities::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(availabilities.filter(id.eq(slot_id)))
            .set(status.eq(new_status))
            .returning(Availability::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Deletes a slot and everything hanging off it (reservations, their
    /// schedule entries, slot schedules, option snapshots) in one
    /// transaction.
    pub async fn delete_cascading(&self, slot_id: i32) -> Result<bool, AppError> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<bool, AppError, _>(|conn| {
            async move {
                use crate::schema::{
                    availabilities, availability_options, availability_schedules,
                    reservation_schedules, reservations,
                };

                let reservation_ids: Vec<i32> = reservations::table
                    .filter(reservations::availability_id.eq(slot_id))
                    .select(reservations::id)
                    .load(conn)
                    .await?;

                diesel::delete(
                    reservation_schedules::table
                        .filter(reservation_schedules::reservation_id.eq_any(&reservation_ids)),
                )
                .execute(conn)
                .await?;

                diesel::delete(
                    reservations::table.filter(reservations::availability_id.eq(slot_id)),
                )
                .execute(conn)
                .await?;

                diesel::delete(
                    availability_schedules::table
                        .filter(availability_schedules::availability_id.eq(slot_id)),
                )
                .execute(conn)
                .await?;

                diesel::delete(
                    availability_options::table
                        .filter(availability_options::availability_id.eq(slot_id)),
                )
                .execute(conn)
                .await?;

                let deleted = diesel::delete(
                    availabilities::table.filter(availabilities::id.eq(slot_id)),
                )
                .execute(conn)
                .await?;

                Ok(deleted > 0)
            }
            .scope_boxed()
        })
        .await
    }

    /// Inserts all schedule sub-entries in one transaction; a failure on any
    /// entry rolls back the whole batch.
    pub async fn attach_schedule(
        &self,
        entries: Vec<NewAvailabilitySchedule>,
    ) -> Result<Vec<AvailabilitySchedule>, AppError> {
        use crate::schema::availability_schedules::dsl::*;
        let mut conn = self.pool.get().await?;

        conn.transaction::<Vec<AvailabilitySchedule>, AppError, _>(|conn| {
            async move {
                let mut inserted = Vec::with_capacity(entries.len());
                for entry in entries {
                    let row = diesel::insert_into(availability_schedules)
                        .values(&entry)
                        .returning(AvailabilitySchedule::as_returning())
                        .get_result(conn)
                        .await?;
                    inserted.push(row);
                }
                Ok(inserted)
            }
            .scope_boxed()
        })
        .await
    }

    /// Schedule entries in insertion order.
    pub async fn list_schedules(
        &self,
        slot_id: i32,
    ) -> Result<Vec<AvailabilitySchedule>, AppError> {
        use crate::schema::availability_schedules::dsl::*;
        let mut conn = self.pool.get().await?;

        availability_schedules
            .filter(availability_id.eq(slot_id))
            .select(AvailabilitySchedule::as_select())
            .order(id.asc())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn attach_option(
        &self,
        new_option: NewAvailabilityOption,
    ) -> Result<AvailabilityOption, AppError> {
        use crate::schema::availability_options::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(availability_options)
            .values(&new_option)
            .returning(AvailabilityOption::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn detach_option(&self, slot_id: i32, option: i32) -> Result<usize, AppError> {
        use crate::schema::availability_options::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(
            availability_options
                .filter(availability_id.eq(slot_id))
                .filter(option_id.eq(option)),
        )
        .execute(&mut conn)
        .await
        .map_err(AppError::from)
    }

    pub async fn list_options(&self, slot_id: i32) -> Result<Vec<AvailabilityOption>, AppError> {
        use crate::schema::availability_options::dsl::*;
        let mut conn = self.pool.get().await?;

        availability_options
            .filter(availability_id.eq(slot_id))
            .select(AvailabilityOption::as_select())
            .order(id.asc())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Claims one capacity unit with a conditional update.
    ///
    /// `UPDATE ... SET reserved_count = reserved_count + 1 WHERE id = $1 AND
    /// reserved_count < capacity` — zero rows affected means either a full
    /// slot or a missing one, and the follow-up read distinguishes the two.
    /// Must run inside the same transaction as the reservation insert; the
    /// row lock taken by the update serializes racing claims.
    pub(crate) async fn claim_slot(
        conn: &mut AsyncPgConnection,
        slot_id: i32,
    ) -> Result<ClaimOutcome, diesel::result::Error> {
        use crate::schema::availabilities::dsl::*;

        let updated: Option<Availability> = diesel::update(
            availabilities
                .filter(id.eq(slot_id))
                .filter(reserved_count.lt(capacity)),
        )
        .set(reserved_count.eq(reserved_count + 1))
        .returning(Availability::as_returning())
        .get_result(conn)
        .await
        .optional()?;

        match updated {
            Some(slot) if slot.reserved_count >= slot.capacity => {
                let slot = diesel::update(availabilities.filter(id.eq(slot.id)))
                    .set(status.eq(SlotStatus::Reserved))
                    .returning(Availability::as_returning())
                    .get_result(conn)
                    .await?;
                Ok(ClaimOutcome::Claimed(slot))
            }
            Some(slot) => Ok(ClaimOutcome::Claimed(slot)),
            None => {
                let existing = availabilities
                    .filter(id.eq(slot_id))
                    .select(Availability::as_select())
                    .first(conn)
                    .await
                    .optional()?;
                match existing {
                    Some(slot) => Ok(ClaimOutcome::Unavailable(slot)),
                    None => Ok(ClaimOutcome::NotFound),
                }
            }
        }
    }

    /// Releases one claimed capacity unit and reopens the slot. The guard on
    /// `reserved_count > 0` keeps the counter from going negative if a
    /// release races an administrative reset.
    pub(crate) async fn release_slot(
        conn: &mut AsyncPgConnection,
        slot_id: i32,
    ) -> Result<Option<Availability>, diesel::result::Error> {
        use crate::schema::availabilities::dsl::*;

        diesel::update(
            availabilities
                .filter(id.eq(slot_id))
                .filter(reserved_count.gt(0)),
        )
        .set((
            reserved_count.eq(reserved_count - 1),
            status.eq(SlotStatus::Open),
        ))
        .returning(Availability::as_returning())
        .get_result(conn)
        .await
        .optional()
    }
}
