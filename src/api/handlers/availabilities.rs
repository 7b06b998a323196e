//! Slot (availability) handlers.

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::Deserialize;

use crate::api::dto::{
    self, AttachOptionRequest, AttachScheduleRequest, AvailabilityOptionResponse,
    AvailabilityResponse, CreateAvailabilityRequest, ScheduleResponse, SetSlotStatusRequest,
};
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::models::{OfferingKind, SlotStatus};
use crate::services::{ADMIN, STAFF};
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

#[derive(Debug, Deserialize)]
pub struct ListAvailabilitiesQuery {
    pub status: Option<SlotStatus>,
    pub limit: Option<i64>,
}

/// Unauthenticated slot reads.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/offerings/{id}/availabilities", get(list_availabilities))
        .route("/availabilities/{id}/schedules", get(list_schedules))
        .route("/availabilities/{id}/options", get(list_slot_options))
}

/// Staff/admin slot management; mounted behind the auth middleware.
pub fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/offerings/{id}/availabilities", post(create_availability))
        .route("/availabilities/{id}/status", put(set_status))
        .route("/availabilities/{id}", delete(delete_availability))
        .route("/availabilities/{id}/schedules", post(attach_schedule))
        .route("/availabilities/{id}/options", post(attach_option))
        .route(
            "/availabilities/{id}/options/{option_id}",
            delete(detach_option),
        )
}

/// GET /api/offerings/{id}/availabilities?status=&limit=
///
/// Ordered by start time; most recent first when a limit is given.
async fn list_availabilities(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<ListAvailabilitiesQuery>,
) -> Result<Json<Vec<AvailabilityResponse>>, AppError> {
    let slots = state
        .services
        .availabilities
        .list_slots(id, query.status, query.limit)
        .await?;
    Ok(Json(
        slots
            .into_iter()
            .map(|(slot, schedules)| AvailabilityResponse::from_slot(slot, schedules))
            .collect(),
    ))
}

/// POST /api/offerings/{id}/availabilities
///
/// Course offerings require `max_reservations`; service offerings get a
/// capacity-1 slot owned by the creating staff member.
async fn create_availability(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<CreateAvailabilityRequest>,
) -> Result<(StatusCode, Json<AvailabilityResponse>), AppError> {
    state
        .services
        .roles
        .authorize(caller.user_id, &[ADMIN, STAFF])
        .await?;

    let starts_at = dto::parse_datetime(&payload.starts_at, "starts_at")?;
    let ends_at = dto::parse_datetime(&payload.ends_at, "ends_at")?;
    let offering = state.services.offerings.get_offering(id).await?;

    let slot = match offering.kind {
        OfferingKind::Course => {
            let max = payload.max_reservations.ok_or_else(|| AppError::Validation {
                field: "max_reservations".to_string(),
                reason: "Capacity is required for course availabilities".to_string(),
            })?;
            state
                .services
                .availabilities
                .create_capacity_slot(id, starts_at, ends_at, max)
                .await?
        }
        OfferingKind::Service => {
            state
                .services
                .availabilities
                .create_slot(
                    caller.user_id,
                    id,
                    starts_at,
                    ends_at,
                    payload.status.unwrap_or(SlotStatus::Open),
                )
                .await?
        }
    };

    Ok((StatusCode::CREATED, Json(AvailabilityResponse::from(slot))))
}

/// PUT /api/availabilities/{id}/status
async fn set_status(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<SetSlotStatusRequest>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    state
        .services
        .roles
        .authorize(caller.user_id, &[ADMIN, STAFF])
        .await?;
    let slot = state
        .services
        .availabilities
        .set_status(id, payload.status)
        .await?;
    Ok(Json(AvailabilityResponse::from(slot)))
}

/// DELETE /api/availabilities/{id} — admin only; cascades to reservations.
async fn delete_availability(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    state.services.roles.authorize(caller.user_id, &[ADMIN]).await?;
    state.services.availabilities.delete_slot(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/availabilities/{id}/schedules
async fn attach_schedule(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<AttachScheduleRequest>,
) -> Result<(StatusCode, Json<Vec<ScheduleResponse>>), AppError> {
    state
        .services
        .roles
        .authorize(caller.user_id, &[ADMIN, STAFF])
        .await?;
    let entries = payload
        .entries
        .into_iter()
        .map(|entry| entry.into_entry())
        .collect();
    let schedules = state
        .services
        .availabilities
        .attach_schedule(id, entries)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(schedules.into_iter().map(ScheduleResponse::from).collect()),
    ))
}

/// GET /api/availabilities/{id}/schedules — entries in insertion order.
async fn list_schedules(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ScheduleResponse>>, AppError> {
    let schedules = state.services.availabilities.list_schedules(id).await?;
    Ok(Json(schedules.into_iter().map(ScheduleResponse::from).collect()))
}

/// POST /api/availabilities/{id}/options — snapshots the option's price.
async fn attach_option(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<AttachOptionRequest>,
) -> Result<(StatusCode, Json<AvailabilityOptionResponse>), AppError> {
    state
        .services
        .roles
        .authorize(caller.user_id, &[ADMIN, STAFF])
        .await?;
    let option = state
        .services
        .availabilities
        .attach_option(id, payload.option_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AvailabilityOptionResponse::from(option)),
    ))
}

async fn detach_option(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((id, option_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    state
        .services
        .roles
        .authorize(caller.user_id, &[ADMIN, STAFF])
        .await?;
    if state
        .services
        .availabilities
        .detach_option(id, option_id)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound {
            entity: "availability_option".to_string(),
            field: "option_id".to_string(),
            value: option_id.to_string(),
        })
    }
}

async fn list_slot_options(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<AvailabilityOptionResponse>>, AppError> {
    let options = state.services.availabilities.list_options(id).await?;
    Ok(Json(
        options
            .into_iter()
            .map(AvailabilityOptionResponse::from)
            .collect(),
    ))
}
