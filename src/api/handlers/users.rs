//! User administration and role-grant handlers. All admin-only; the role
//! check hits the database on every request so grant expiry is immediate.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};

use crate::api::dto::{AssignRoleRequest, RolesResponse, UserResponse};
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::services::ADMIN;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Routes:
/// - GET    /users                    - List users
/// - GET    /users/{id}               - Get one user
/// - GET    /users/{id}/roles         - Current role grants
/// - POST   /users/{id}/roles         - Grant a role (optionally temporary)
/// - DELETE /users/{id}/roles/{role}  - Revoke a role
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/roles", get(list_roles).post(assign_role))
        .route("/users/{id}/roles/{role}", delete(revoke_role))
}

async fn list_users(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    state.services.roles.authorize(caller.user_id, &[ADMIN]).await?;
    let users = state.services.users.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

async fn get_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    state.services.roles.authorize(caller.user_id, &[ADMIN]).await?;
    let user = state.services.users.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

async fn list_roles(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<RolesResponse>, AppError> {
    state.services.roles.authorize(caller.user_id, &[ADMIN]).await?;
    let roles = state.services.roles.roles_for(id).await?;
    Ok(Json(RolesResponse { user_id: id, roles }))
}

/// POST /api/users/{id}/roles
///
/// Temporary grants are stamped now and revoked by the sweep once the
/// grace window passes.
async fn assign_role(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<AssignRoleRequest>,
) -> Result<(StatusCode, Json<RolesResponse>), AppError> {
    state.services.roles.authorize(caller.user_id, &[ADMIN]).await?;
    state.services.users.get_user(id).await?;
    state
        .services
        .roles
        .assign_role(id, &payload.role, payload.temporary)
        .await?;
    let roles = state.services.roles.roles_for(id).await?;
    Ok((StatusCode::CREATED, Json(RolesResponse { user_id: id, roles })))
}

async fn revoke_role(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((id, role)): Path<(i32, String)>,
) -> Result<StatusCode, AppError> {
    state.services.roles.authorize(caller.user_id, &[ADMIN]).await?;
    if state.services.roles.revoke_role(id, &role).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound {
            entity: "role grant".to_string(),
            field: "role".to_string(),
            value: role,
        })
    }
}
