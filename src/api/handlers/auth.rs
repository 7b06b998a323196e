//! Authentication handlers.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::api::dto::{LoginRequest, RefreshRequest, RegisterRequest, TokenResponse, UserResponse};
use crate::error::AppError;
use crate::services::CUSTOMER;
use crate::state::AppState;
use crate::utils::jwt::{generate_token_pair, validate_refresh_token};
use crate::utils::validate::ValidatedJson;

/// Routes:
/// - POST /register - Create an account
/// - POST /login    - Exchange credentials for a token pair
/// - POST /refresh  - Exchange a refresh token for a new pair
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}

/// POST /api/auth/register
///
/// New accounts start with the customer role.
async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = state.services.users.register(payload.into_new_user()).await?;
    if let Err(e) = state
        .services
        .roles
        .assign_role(user.id, CUSTOMER, false)
        .await
    {
        tracing::warn!(error = %e, user_id = user.id, "Failed to assign default role");
    }
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = state
        .services
        .users
        .authenticate(&payload.email, &payload.password)
        .await?;

    let (access_token, refresh_token) = generate_token_pair(
        user.id,
        user.email,
        user.username,
        &state.jwt_config.secret,
        state.jwt_config.access_token_expiration,
        state.jwt_config.refresh_token_expiration,
    )?;

    Ok(Json(TokenResponse::bearer(access_token, refresh_token)))
}

/// POST /api/auth/refresh
async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let claims = validate_refresh_token(&payload.refresh_token, &state.jwt_config.secret)?;
    let user_id: i32 = claims.sub.parse().map_err(|_| AppError::Unauthorized {
        message: "Invalid token subject".to_string(),
    })?;

    // Re-read the user so a deleted account cannot refresh itself back in.
    let user = state.services.users.get_user(user_id).await?;

    let (access_token, refresh_token) = generate_token_pair(
        user.id,
        user.email,
        user.username,
        &state.jwt_config.secret,
        state.jwt_config.access_token_expiration,
        state.jwt_config.refresh_token_expiration,
    )?;

    Ok(Json(TokenResponse::bearer(access_token, refresh_token)))
}
