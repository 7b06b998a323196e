//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod availability_service;
mod offering_service;
mod reservation_service;
mod role_service;
mod user_service;

pub mod notifications;

pub use availability_service::AvailabilityService;
pub use offering_service::OfferingService;
pub use reservation_service::{ReservationService, ReservationSummary};
pub use role_service::{ADMIN, CUSTOMER, RoleService, STAFF};
pub use user_service::UserService;

use crate::config::Settings;
use crate::realtime::EventBroadcaster;
use crate::repositories::Repositories;
use notifications::NotificationService;

/// Aggregates all services for convenient access.
///
/// Designed to be carried inside the Axum application state; cloning is
/// cheap since the underlying pool is reference-counted.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub roles: RoleService,
    pub offerings: OfferingService,
    pub availabilities: AvailabilityService,
    pub reservations: ReservationService,
    pub notifications: NotificationService,
}

impl Services {
    /// Creates a new Services instance from repositories and configuration.
    pub fn new(
        repos: Repositories,
        settings: &Settings,
        broadcaster: EventBroadcaster,
    ) -> Self {
        let notifications =
            NotificationService::new(settings.mail.clone(), settings.application.name.clone());
        Self {
            users: UserService::new(repos.users.clone()),
            roles: RoleService::new(repos.roles.clone(), settings.roles.clone()),
            offerings: OfferingService::new(repos.offerings.clone()),
            availabilities: AvailabilityService::new(
                repos.availabilities.clone(),
                repos.offerings.clone(),
                broadcaster.clone(),
            ),
            reservations: ReservationService::new(
                repos.reservations,
                repos.availabilities,
                repos.offerings,
                repos.users,
                settings.booking.clone(),
                broadcaster,
                notifications.clone(),
            ),
            notifications,
        }
    }
}
