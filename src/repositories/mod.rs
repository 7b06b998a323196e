//! Repository layer for data access operations.
//!
//! Provides async CRUD operations for all domain entities. Multi-statement
//! booking writes run inside a single database transaction; the claim
//! primitive lives in `availability_repo` and is the only code path that
//! mutates a slot's capacity accounting.

mod availability_repo;
mod offering_repo;
mod reservation_repo;
mod role_repo;
mod user_repo;

pub use availability_repo::{AvailabilityRepository, ClaimOutcome};
pub use offering_repo::OfferingRepository;
pub use reservation_repo::{ReservationDetail, ReservationRepository, ScheduleEntry};
pub use role_repo::RoleRepository;
pub use user_repo::UserRepository;

use crate::db::AsyncDbPool;

/// Aggregates all repositories for convenient access.
///
/// Since `AsyncDbPool` uses `Arc` internally, cloning is cheap.
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub roles: RoleRepository,
    pub offerings: OfferingRepository,
    pub availabilities: AvailabilityRepository,
    pub reservations: ReservationRepository,
}

impl Repositories {
    /// Creates a new Repositories instance with all repositories initialized.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            roles: RoleRepository::new(pool.clone()),
            offerings: OfferingRepository::new(pool.clone()),
            availabilities: AvailabilityRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool),
        }
    }
}
