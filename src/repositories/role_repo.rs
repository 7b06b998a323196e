//! Role and role-grant repository.
//!
//! Authorization reads always filter expired temporary grants at query
//! time; nothing here is cached, so a revocation takes effect on the next
//! request.

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use jiff_diesel::DateTime;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{NewUserRole, Role, UserRole};

#[derive(Clone)]
pub struct RoleRepository {
    pool: AsyncDbPool,
}

impl RoleRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_name(&self, role_name: &str) -> Result<Option<Role>, AppError> {
        use crate::schema::roles::dsl::*;
        let mut conn = self.pool.get().await?;

        roles
            .filter(name.eq(role_name))
            .select(Role::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Grants a role to a user. Fails with `Duplicate` if the user already
    /// holds the role (temporary or not).
    pub async fn assign(
        &self,
        user: i32,
        role_name: &str,
        temporary: bool,
        granted_at: DateTime,
    ) -> Result<UserRole, AppError> {
        let role = self
            .find_by_name(role_name)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "role".to_string(),
                field: "name".to_string(),
                value: role_name.to_string(),
            })?;

        use crate::schema::user_roles::dsl::*;
        let mut conn = self.pool.get().await?;

        let existing: Option<UserRole> = user_roles
            .filter(user_id.eq(user))
            .filter(role_id.eq(role.id))
            .select(UserRole::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        if existing.is_some() {
            return Err(AppError::Duplicate {
                entity: "user_roles".to_string(),
                field: "role".to_string(),
                value: role_name.to_string(),
            });
        }

        diesel::insert_into(user_roles)
            .values(&NewUserRole {
                user_id: user,
                role_id: role.id,
                is_temporary: temporary,
                assigned_at: granted_at,
            })
            .returning(UserRole::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn revoke(&self, user: i32, role_name: &str) -> Result<usize, AppError> {
        use crate::schema::{roles, user_roles};
        let mut conn = self.pool.get().await?;

        let role_ids = roles::table
            .filter(roles::name.eq(role_name))
            .select(roles::id);

        diesel::delete(
            user_roles::table
                .filter(user_roles::user_id.eq(user))
                .filter(user_roles::role_id.eq_any(role_ids)),
        )
        .execute(&mut conn)
        .await
        .map_err(AppError::from)
    }

    /// Role names the user currently holds. A temporary grant counts only
    /// while `assigned_at` is at or after the cutoff.
    pub async fn active_roles_for_user(
        &self,
        user: i32,
        cutoff: DateTime,
    ) -> Result<Vec<String>, AppError> {
        use crate::schema::{roles, user_roles};
        let mut conn = self.pool.get().await?;

        user_roles::table
            .inner_join(roles::table)
            .filter(user_roles::user_id.eq(user))
            .filter(
                user_roles::is_temporary
                    .eq(false)
                    .or(user_roles::assigned_at.ge(cutoff)),
            )
            .select(roles::name)
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Revokes every temporary grant older than the cutoff and returns the
    /// affected (user_id, role_name) pairs, in one transaction.
    pub async fn revoke_expired(
        &self,
        cutoff: DateTime,
    ) -> Result<Vec<(i32, String)>, AppError> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<Vec<(i32, String)>, AppError, _>(|conn| {
            async move {
                use crate::schema::{roles, user_roles};

                let expired: Vec<(i32, i32, String)> = user_roles::table
                    .inner_join(roles::table)
                    .filter(user_roles::is_temporary.eq(true))
                    .filter(user_roles::assigned_at.lt(cutoff))
                    .select((user_roles::id, user_roles::user_id, roles::name))
                    .load(conn)
                    .await?;

                let grant_ids: Vec<i32> = expired.iter().map(|(grant_id, _, _)| *grant_id).collect();
                diesel::delete(user_roles::table.filter(user_roles::id.eq_any(&grant_ids)))
                    .execute(conn)
                    .await?;

                Ok(expired
                    .into_iter()
                    .map(|(_, user, role_name)| (user, role_name))
                    .collect())
            }
            .scope_boxed()
        })
        .await
    }
}
