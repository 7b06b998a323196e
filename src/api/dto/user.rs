//! User and role-grant DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::User;

/// User data without sensitive fields.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            phone: user.phone,
            created_at: user.created_at.to_jiff().to_string(),
        }
    }
}

/// Request body for granting a role.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AssignRoleRequest {
    #[validate(length(min = 1, message = "Role name is required"))]
    pub role: String,
    /// Temporary grants expire after the configured grace window.
    #[serde(default)]
    pub temporary: bool,
}

/// Current role names held by a user.
#[derive(Debug, Serialize, ToSchema)]
pub struct RolesResponse {
    pub user_id: i32,
    pub roles: Vec<String>,
}
