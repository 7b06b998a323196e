//! JWT authentication middleware.
//!
//! Validates the bearer token and injects `AuthUser` into request
//! extensions. Roles are deliberately NOT part of the token or this
//! middleware: handlers re-check grants against the database per request,
//! so expiring temporary grants take effect immediately.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt::{Claims, validate_access_token};

/// Authenticated caller identity, extracted in handlers with
/// `Extension<AuthUser>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub username: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub.parse().unwrap_or(0),
            email: claims.email,
            username: claims.username,
        }
    }
}

/// Validates `Authorization: Bearer <token>` and stores the caller
/// identity for downstream handlers. Returns 401 on a missing, malformed,
/// invalid, or expired token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing authorization header".to_string(),
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized {
            message: "Invalid authorization header format. Expected: Bearer <token>".to_string(),
        })?;

    let claims = validate_access_token(token, &state.jwt_config.secret)?;

    let auth_user = AuthUser::from(claims);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::TokenType;

    #[test]
    fn auth_user_from_claims() {
        let claims = Claims {
            sub: "123".to_string(),
            email: "test@example.com".to_string(),
            username: "testuser".to_string(),
            token_type: TokenType::Access,
            iat: 0,
            exp: 9999999999,
        };

        let auth_user = AuthUser::from(claims);
        assert_eq!(auth_user.user_id, 123);
        assert_eq!(auth_user.email, "test@example.com");
        assert_eq!(auth_user.username, "testuser");
    }

    #[test]
    fn auth_user_from_claims_with_bad_subject() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            email: "test@example.com".to_string(),
            username: "testuser".to_string(),
            token_type: TokenType::Access,
            iat: 0,
            exp: 9999999999,
        };

        // Falls back to 0, which no real user has; role checks then fail.
        assert_eq!(AuthUser::from(claims).user_id, 0);
    }
}
