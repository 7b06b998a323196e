//! Application state for the Axum router.

use crate::config::{JwtConfig, Settings};
use crate::db::AsyncDbPool;
use crate::realtime::EventBroadcaster;
use crate::repositories::Repositories;
use crate::services::Services;

/// Shared state behind every request handler.
///
/// Cloning is cheap: services and the pool are reference-counted, and the
/// broadcaster is a channel handle.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub db_pool: AsyncDbPool,
    pub jwt_config: JwtConfig,
    pub broadcaster: EventBroadcaster,
}

impl AppState {
    /// Wires repositories, services, and the event hub from a connection
    /// pool and loaded settings.
    pub fn new(pool: AsyncDbPool, settings: &Settings) -> Self {
        let broadcaster = EventBroadcaster::new();
        let repos = Repositories::new(pool.clone());
        let services = Services::new(repos, settings, broadcaster.clone());
        Self {
            services,
            db_pool: pool,
            jwt_config: settings.jwt.clone(),
            broadcaster,
        }
    }
}
