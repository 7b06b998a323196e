//! Role grants and per-request authorization.
//!
//! Role checks always hit the database so that revocations — including the
//! sweep's expiry of temporary grants — take effect on the very next
//! request. There is deliberately no in-process role cache.

use jiff::{Span, Zoned, civil};
use jiff_diesel::ToDiesel;

use crate::config::RolesConfig;
use crate::error::{AppError, AppResult};
use crate::models::UserRole;
use crate::repositories::RoleRepository;

pub const ADMIN: &str = "admin";
pub const STAFF: &str = "staff";
pub const CUSTOMER: &str = "customer";

#[derive(Clone)]
pub struct RoleService {
    repo: RoleRepository,
    config: RolesConfig,
}

/// The moment before which a temporary grant no longer counts.
fn expiry_cutoff(now: civil::DateTime, grant_ttl_secs: u64) -> civil::DateTime {
    now.checked_sub(Span::new().seconds(grant_ttl_secs as i64))
        .unwrap_or(civil::DateTime::MIN)
}

impl RoleService {
    pub fn new(repo: RoleRepository, config: RolesConfig) -> Self {
        Self { repo, config }
    }

    fn cutoff(&self) -> civil::DateTime {
        expiry_cutoff(Zoned::now().datetime(), self.config.grant_ttl_secs)
    }

    /// Role names the user holds right now, expired temporaries excluded.
    pub async fn roles_for(&self, user_id: i32) -> AppResult<Vec<String>> {
        self.repo
            .active_roles_for_user(user_id, self.cutoff().to_diesel())
            .await
    }

    /// Fails with `Forbidden` unless the user currently holds one of the
    /// allowed roles.
    pub async fn authorize(&self, user_id: i32, allowed: &[&str]) -> AppResult<()> {
        let held = self.roles_for(user_id).await?;
        if held.iter().any(|role| allowed.contains(&role.as_str())) {
            Ok(())
        } else {
            Err(AppError::Forbidden {
                message: format!("Requires one of the following roles: {}", allowed.join(", ")),
            })
        }
    }

    /// Grants a role; temporary grants are stamped with the current time and
    /// expire after the configured grace window.
    pub async fn assign_role(
        &self,
        user_id: i32,
        role_name: &str,
        temporary: bool,
    ) -> AppResult<UserRole> {
        self.repo
            .assign(
                user_id,
                role_name,
                temporary,
                Zoned::now().datetime().to_diesel(),
            )
            .await
    }

    pub async fn revoke_role(&self, user_id: i32, role_name: &str) -> AppResult<bool> {
        let affected = self.repo.revoke(user_id, role_name).await?;
        Ok(affected > 0)
    }

    /// Revokes all expired temporary grants, returning the affected
    /// (user_id, role_name) pairs for event emission.
    pub async fn sweep_expired_grants(&self) -> AppResult<Vec<(i32, String)>> {
        let revoked = self.repo.revoke_expired(self.cutoff().to_diesel()).await?;
        if !revoked.is_empty() {
            tracing::info!(count = revoked.len(), "Revoked expired temporary role grants");
        }
        Ok(revoked)
    }

    pub async fn role_exists(&self, role_name: &str) -> AppResult<()> {
        self.repo
            .find_by_name(role_name)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound {
                entity: "role".to_string(),
                field: "name".to_string(),
                value: role_name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_subtracts_ttl() {
        let now = civil::date(2026, 6, 1).at(12, 0, 0, 0);
        let cutoff = expiry_cutoff(now, 3600);
        assert_eq!(cutoff, civil::date(2026, 6, 1).at(11, 0, 0, 0));
    }

    #[test]
    fn grant_at_cutoff_boundary_is_still_active() {
        // active_roles_for_user keeps grants with assigned_at >= cutoff, so
        // a grant exactly grant_ttl_secs old survives until the next tick.
        let now = civil::date(2026, 6, 1).at(12, 0, 0, 0);
        let cutoff = expiry_cutoff(now, 60);
        let assigned_at = civil::date(2026, 6, 1).at(11, 59, 0, 0);
        assert!(assigned_at >= cutoff);
    }

    #[test]
    fn older_grant_falls_before_cutoff() {
        let now = civil::date(2026, 6, 1).at(12, 0, 0, 0);
        let cutoff = expiry_cutoff(now, 60);
        let assigned_at = civil::date(2026, 6, 1).at(11, 58, 59, 0);
        assert!(assigned_at < cutoff);
    }
}
