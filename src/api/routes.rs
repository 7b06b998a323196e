//! Router configuration.
//!
//! Reads (catalog, slots, schedules, health, the event feed) are public;
//! every mutation goes through the JWT auth middleware, and role checks
//! happen inside the handlers against the database.

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{auth_middleware, logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Builds the application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .nest("/auth", handlers::auth::auth_routes())
        .merge(handlers::health::health_routes())
        .merge(handlers::events::event_routes())
        .merge(handlers::offerings::public_routes())
        .merge(handlers::availabilities::public_routes());

    let protected = Router::new()
        .merge(handlers::users::user_routes())
        .merge(handlers::offerings::admin_routes())
        .merge(handlers::availabilities::staff_routes())
        .merge(handlers::reservations::reservation_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api", public.merge(protected))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Middleware runs in reverse registration order, so request ids
        // exist before the logger reads them.
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .with_state(state)
}
