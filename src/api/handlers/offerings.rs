//! Catalog handlers for offerings and add-on options.

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;

use crate::api::dto::{
    self, CreateOfferingRequest, CreateOptionRequest, OfferingOptionResponse, OfferingResponse,
    UpdateOfferingRequest, UpdateOptionRequest, UpdatePriceRequest,
};
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::models::OfferingKind;
use crate::services::ADMIN;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

#[derive(Debug, Deserialize)]
pub struct ListOfferingsQuery {
    pub kind: Option<OfferingKind>,
}

/// Unauthenticated catalog reads.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/offerings", get(list_offerings))
        .route("/offerings/{id}", get(get_offering))
        .route("/offerings/{id}/options", get(list_options))
}

/// Admin-only catalog mutation; mounted behind the auth middleware.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/offerings", post(create_offering))
        .route("/offerings/{id}", put(update_offering))
        .route("/offerings/{id}/price", put(update_price))
        .route("/offerings/{id}/options", post(create_option))
        .route("/options/{id}", put(update_option).delete(delete_option))
}

async fn list_offerings(
    State(state): State<AppState>,
    Query(query): Query<ListOfferingsQuery>,
) -> Result<Json<Vec<OfferingResponse>>, AppError> {
    let offerings = state.services.offerings.list_offerings(query.kind).await?;
    Ok(Json(
        offerings.into_iter().map(OfferingResponse::from).collect(),
    ))
}

async fn get_offering(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OfferingResponse>, AppError> {
    let offering = state.services.offerings.get_offering(id).await?;
    Ok(Json(OfferingResponse::from(offering)))
}

async fn create_offering(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<CreateOfferingRequest>,
) -> Result<(StatusCode, Json<OfferingResponse>), AppError> {
    state.services.roles.authorize(caller.user_id, &[ADMIN]).await?;
    let offering = state
        .services
        .offerings
        .create_offering(payload.into_new_offering()?)
        .await?;
    Ok((StatusCode::CREATED, Json(OfferingResponse::from(offering))))
}

async fn update_offering(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateOfferingRequest>,
) -> Result<Json<OfferingResponse>, AppError> {
    state.services.roles.authorize(caller.user_id, &[ADMIN]).await?;
    let offering = state
        .services
        .offerings
        .update_offering(id, payload.into_update_offering()?)
        .await?;
    Ok(Json(OfferingResponse::from(offering)))
}

async fn update_price(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdatePriceRequest>,
) -> Result<Json<OfferingResponse>, AppError> {
    state.services.roles.authorize(caller.user_id, &[ADMIN]).await?;
    let price = dto::parse_price(&payload.price)?;
    let offering = state.services.offerings.update_price(id, price).await?;
    Ok(Json(OfferingResponse::from(offering)))
}

async fn list_options(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<OfferingOptionResponse>>, AppError> {
    let options = state.services.offerings.list_options(id).await?;
    Ok(Json(
        options
            .into_iter()
            .map(OfferingOptionResponse::from)
            .collect(),
    ))
}

async fn create_option(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<CreateOptionRequest>,
) -> Result<(StatusCode, Json<OfferingOptionResponse>), AppError> {
    state.services.roles.authorize(caller.user_id, &[ADMIN]).await?;
    let price = dto::parse_price(&payload.price)?;
    let option = state
        .services
        .offerings
        .add_option(id, payload.name, price)
        .await?;
    Ok((StatusCode::CREATED, Json(OfferingOptionResponse::from(option))))
}

async fn update_option(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateOptionRequest>,
) -> Result<Json<OfferingOptionResponse>, AppError> {
    state.services.roles.authorize(caller.user_id, &[ADMIN]).await?;
    let option = state
        .services
        .offerings
        .update_option(id, payload.into_update_option()?)
        .await?;
    Ok(Json(OfferingOptionResponse::from(option)))
}

async fn delete_option(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    state.services.roles.authorize(caller.user_id, &[ADMIN]).await?;
    if state.services.offerings.delete_option(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound {
            entity: "offering_option".to_string(),
            field: "id".to_string(),
            value: id.to_string(),
        })
    }
}
