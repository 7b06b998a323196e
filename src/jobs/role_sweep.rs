//! Periodic revocation of expired temporary role grants.
//!
//! Runs every `roles.sweep_interval_secs`, revokes temporary grants older
//! than the grace window, and broadcasts a `roleRevoked` event per affected
//! user so connected clients can drop privileged UI immediately. Because
//! authorization re-reads grants per request, access is already gone before
//! the event lands; the broadcast is purely advisory.

use std::time::Duration;

use tokio_cron_scheduler::Job;

use crate::error::{AppError, AppResult};
use crate::realtime::{BookingEvent, EventBroadcaster};
use crate::services::RoleService;

#[derive(Clone)]
pub struct RoleSweep {
    roles: RoleService,
    broadcaster: EventBroadcaster,
}

impl RoleSweep {
    pub fn new(roles: RoleService, broadcaster: EventBroadcaster) -> Self {
        Self { roles, broadcaster }
    }

    /// One sweep pass. Returns the number of revoked grants.
    pub async fn run(&self) -> AppResult<usize> {
        let revoked = self.roles.sweep_expired_grants().await?;
        for (user_id, role) in &revoked {
            self.broadcaster.publish(BookingEvent::RoleRevoked {
                user_id: *user_id,
                role: role.clone(),
            });
        }
        Ok(revoked.len())
    }

    /// Packages the sweep as a repeating scheduler job.
    pub fn into_job(self, interval: Duration) -> AppResult<Job> {
        Job::new_repeated_async(interval, move |_uuid, _lock| {
            let sweep = self.clone();
            Box::pin(async move {
                if let Err(e) = sweep.run().await {
                    tracing::error!(error = %e, "Role grant sweep failed");
                }
            })
        })
        .map_err(|e| AppError::Internal {
            source: anyhow::Error::from(e),
        })
    }
}
