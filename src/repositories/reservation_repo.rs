//! Reservation repository.
//!
//! Every write that claims or releases slot capacity is a single database
//! transaction pairing the capacity update with the reservation rows, so a
//! racing caller either gets the whole state change or a typed conflict.

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use jiff_diesel::DateTime;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{
    Availability, NewReservation, NewReservationSchedule, Reservation, ReservationSchedule,
    ReservationStatus,
};
use crate::repositories::availability_repo::{AvailabilityRepository, ClaimOutcome};

/// A reservation joined with the reserving user's name and the offering
/// title, as listed in reports and staff views.
#[derive(Debug, Clone)]
pub struct ReservationDetail {
    pub reservation: Reservation,
    pub user_name: String,
    pub offering_title: String,
}

/// Weekly schedule entry supplied with a course reservation, before the
/// owning reservation id exists.
#[derive(Debug, Clone)]
pub struct ScheduleEntry {
    pub weekday: i16,
    pub starts_at: String,
    pub ends_at: String,
}

#[derive(Clone)]
pub struct ReservationRepository {
    pool: AsyncDbPool,
}

impl ReservationRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Claims the slot and inserts the reservation in one transaction.
    ///
    /// With `denormalize_bounds` the slot's time window is copied onto the
    /// reservation row (proof-of-payment flow). The loser of a claim race
    /// gets `SlotConflict` for single-unit slots or `CapacityExceeded` for
    /// counting slots, never a double-claim.
    pub async fn create_claiming(
        &self,
        mut new_reservation: NewReservation,
        schedule: Vec<ScheduleEntry>,
        denormalize_bounds: bool,
    ) -> Result<(Reservation, Availability), AppError> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<(Reservation, Availability), AppError, _>(|conn| {
            async move {
                let slot_id = new_reservation.availability_id;
                let slot = match AvailabilityRepository::claim_slot(conn, slot_id).await? {
                    ClaimOutcome::Claimed(slot) => slot,
                    ClaimOutcome::Unavailable(slot) => {
                        return Err(if slot.capacity == 1 {
                            AppError::SlotConflict {
                                availability_id: slot_id,
                            }
                        } else {
                            AppError::CapacityExceeded {
                                availability_id: slot_id,
                                capacity: slot.capacity,
                            }
                        });
                    }
                    ClaimOutcome::NotFound => {
                        return Err(AppError::NotFound {
                            entity: "availability".to_string(),
                            field: "id".to_string(),
                            value: slot_id.to_string(),
                        });
                    }
                };

                if denormalize_bounds {
                    new_reservation.slot_starts_at = Some(slot.starts_at.clone());
                    new_reservation.slot_ends_at = Some(slot.ends_at.clone());
                }

                let reservation = diesel::insert_into(crate::schema::reservations::table)
                    .values(&new_reservation)
                    .returning(Reservation::as_returning())
                    .get_result(conn)
                    .await?;

                for entry in schedule {
                    diesel::insert_into(crate::schema::reservation_schedules::table)
                        .values(&NewReservationSchedule {
                            reservation_id: reservation.id,
                            weekday: entry.weekday,
                            starts_at: entry.starts_at,
                            ends_at: entry.ends_at,
                        })
                        .execute(conn)
                        .await?;
                }

                Ok((reservation, slot))
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn find_by_id(&self, reservation_id: i32) -> Result<Option<Reservation>, AppError> {
        use crate::schema::reservations::dsl::*;
        let mut conn = self.pool.get().await?;

        reservations
            .filter(id.eq(reservation_id))
            .select(Reservation::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Overwrites the reservation status. Idempotent by construction.
    pub async fn set_status(
        &self,
        reservation_id: i32,
        new_status: ReservationStatus,
    ) -> Result<Option<Reservation>, AppError> {
        use crate::schema::reservations::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(reservations.filter(id.eq(reservation_id)))
            .set(status.eq(new_status))
            .returning(Reservation::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Deletes a reservation and its schedule entries; with `release` the
    /// claimed capacity unit is handed back and the slot reopened, all in
    /// one transaction. Returns the deleted reservation and, when released,
    /// the slot's new state.
    pub async fn delete(
        &self,
        reservation_id: i32,
        release: bool,
    ) -> Result<Option<(Reservation, Option<Availability>)>, AppError> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<Option<(Reservation, Option<Availability>)>, AppError, _>(|conn| {
            async move {
                use crate::schema::{reservation_schedules, reservations};

                let Some(reservation) = reservations::table
                    .filter(reservations::id.eq(reservation_id))
                    .select(Reservation::as_select())
                    .first(conn)
                    .await
                    .optional()?
                else {
                    return Ok(None);
                };

                diesel::delete(
                    reservation_schedules::table
                        .filter(reservation_schedules::reservation_id.eq(reservation_id)),
                )
                .execute(conn)
                .await?;

                diesel::delete(reservations::table.filter(reservations::id.eq(reservation_id)))
                    .execute(conn)
                    .await?;

                let released_slot = if release {
                    AvailabilityRepository::release_slot(conn, reservation.availability_id).await?
                } else {
                    None
                };

                Ok(Some((reservation, released_slot)))
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn list_schedules(
        &self,
        reservation: i32,
    ) -> Result<Vec<ReservationSchedule>, AppError> {
        use crate::schema::reservation_schedules::dsl::*;
        let mut conn = self.pool.get().await?;

        reservation_schedules
            .filter(reservation_id.eq(reservation))
            .select(ReservationSchedule::as_select())
            .order(id.asc())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Reservations made by one user, newest first, with offering titles.
    pub async fn list_for_user(&self, user: i32) -> Result<Vec<ReservationDetail>, AppError> {
        use crate::schema::{availabilities, offerings, reservations, users};
        let mut conn = self.pool.get().await?;

        let rows: Vec<(Reservation, String, String)> = reservations::table
            .inner_join(users::table)
            .inner_join(availabilities::table.inner_join(offerings::table))
            .filter(reservations::user_id.eq(user))
            .select((
                Reservation::as_select(),
                users::username,
                offerings::title,
            ))
            .order(reservations::created_at.desc())
            .load(&mut conn)
            .await?;

        Ok(rows.into_iter().map(Self::into_detail).collect())
    }

    /// All reservations against an offering's slots, newest first.
    pub async fn list_for_offering(
        &self,
        offering: i32,
    ) -> Result<Vec<ReservationDetail>, AppError> {
        use crate::schema::{availabilities, offerings, reservations, users};
        let mut conn = self.pool.get().await?;

        let rows: Vec<(Reservation, String, String)> = reservations::table
            .inner_join(users::table)
            .inner_join(availabilities::table.inner_join(offerings::table))
            .filter(availabilities::offering_id.eq(offering))
            .select((
                Reservation::as_select(),
                users::username,
                offerings::title,
            ))
            .order(reservations::created_at.desc())
            .load(&mut conn)
            .await?;

        Ok(rows.into_iter().map(Self::into_detail).collect())
    }

    /// Reservations created inside the inclusive timestamp range, for the
    /// close-out summary.
    pub async fn list_created_between(
        &self,
        from: DateTime,
        to: DateTime,
    ) -> Result<Vec<ReservationDetail>, AppError> {
        use crate::schema::{availabilities, offerings, reservations, users};
        let mut conn = self.pool.get().await?;

        let rows: Vec<(Reservation, String, String)> = reservations::table
            .inner_join(users::table)
            .inner_join(availabilities::table.inner_join(offerings::table))
            .filter(reservations::created_at.between(from, to))
            .select((
                Reservation::as_select(),
                users::username,
                offerings::title,
            ))
            .order(reservations::created_at.asc())
            .load(&mut conn)
            .await?;

        Ok(rows.into_iter().map(Self::into_detail).collect())
    }

    fn into_detail((reservation, user_name, offering_title): (Reservation, String, String)) -> ReservationDetail {
        ReservationDetail {
            reservation,
            user_name,
            offering_title,
        }
    }
}
