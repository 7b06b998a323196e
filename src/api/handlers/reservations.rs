//! Reservation handlers, including the close-out summary.

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};

use crate::api::dto::{
    self, CourseReservationRequest, CreateReservationRequest, ReservationDetailResponse,
    ReservationResponse, ReserveWithProofRequest, SummaryQuery, SummaryResponse,
    UpdateReservationStatusRequest,
};
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::models::ReservationStatus;
use crate::services::{ADMIN, STAFF};
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Routes (all authenticated):
/// - POST   /reservations                              - Bare reserve
/// - POST   /availabilities/{id}/proof                 - Reserve with payment proof
/// - POST   /availabilities/{id}/course-reservations   - Course flow with schedule
/// - GET    /reservations/mine                         - Caller's reservations
/// - GET    /reservations/summary                      - Close-out report (admin)
/// - PUT    /reservations/{id}/status                  - Complete or revert (staff/admin)
/// - DELETE /reservations/{id}                         - Remove (staff/admin)
/// - GET    /offerings/{id}/reservations               - Staff listing
pub fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route("/reservations", post(create_reservation))
        .route("/availabilities/{id}/proof", post(reserve_with_proof))
        .route(
            "/availabilities/{id}/course-reservations",
            post(reserve_course),
        )
        .route("/reservations/mine", get(my_reservations))
        .route("/reservations/summary", get(summary))
        .route("/reservations/{id}/status", put(set_status))
        .route("/reservations/{id}", delete(delete_reservation))
        .route("/offerings/{id}/reservations", get(offering_reservations))
}

/// POST /api/reservations
///
/// Claims the slot and creates a pending reservation; the loser of a
/// concurrent claim gets a 409 (single slots) or 400 (full course).
async fn create_reservation(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), AppError> {
    let price = payload
        .price
        .as_deref()
        .map(dto::parse_price)
        .transpose()?;
    let reservation = state
        .services
        .reservations
        .reserve(caller.user_id, payload.availability_id, price)
        .await?;
    Ok((StatusCode::CREATED, Json(ReservationResponse::from(reservation))))
}

/// POST /api/availabilities/{id}/proof
async fn reserve_with_proof(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ReserveWithProofRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), AppError> {
    let price = dto::parse_price(&payload.price)?;
    let reservation = state
        .services
        .reservations
        .reserve_with_proof(
            caller.user_id,
            id,
            payload.proof_reference,
            price,
            payload.selected_option_names,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ReservationResponse::from(reservation))))
}

/// POST /api/availabilities/{id}/course-reservations
///
/// The (capacity+1)-th concurrent attempt fails with CAPACITY_EXCEEDED.
async fn reserve_course(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<CourseReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), AppError> {
    let (reservation, schedules) = state
        .services
        .reservations
        .reserve_course_with_schedule(
            id,
            caller.user_id,
            payload.status.unwrap_or(ReservationStatus::Pending),
            payload.contact_name,
            payload.contact_email,
            payload.contact_phone,
            payload
                .schedule
                .into_iter()
                .map(|entry| entry.into_entry())
                .collect(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse::from_reservation(reservation, schedules)),
    ))
}

/// GET /api/reservations/mine
async fn my_reservations(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<Vec<ReservationDetailResponse>>, AppError> {
    let rows = state
        .services
        .reservations
        .list_for_user(caller.user_id)
        .await?;
    Ok(Json(
        rows.into_iter()
            .map(|(detail, schedules)| ReservationDetailResponse::from_detail(detail, schedules))
            .collect(),
    ))
}

/// GET /api/offerings/{id}/reservations — staff view.
async fn offering_reservations(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ReservationDetailResponse>>, AppError> {
    state
        .services
        .roles
        .authorize(caller.user_id, &[ADMIN, STAFF])
        .await?;
    let rows = state.services.reservations.list_for_offering(id).await?;
    Ok(Json(
        rows.into_iter()
            .map(|(detail, schedules)| ReservationDetailResponse::from_detail(detail, schedules))
            .collect(),
    ))
}

/// PUT /api/reservations/{id}/status
///
/// `completed` finalizes; `pending` reverts the status field only and
/// never releases the claimed slot.
async fn set_status(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateReservationStatusRequest>,
) -> Result<Json<ReservationResponse>, AppError> {
    state
        .services
        .roles
        .authorize(caller.user_id, &[ADMIN, STAFF])
        .await?;
    let reservation = match payload.status {
        ReservationStatus::Completed => state.services.reservations.complete(id).await?,
        ReservationStatus::Pending => state.services.reservations.mark_pending(id).await?,
    };
    Ok(Json(ReservationResponse::from(reservation)))
}

/// DELETE /api/reservations/{id}
async fn delete_reservation(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    state
        .services
        .roles
        .authorize(caller.user_id, &[ADMIN, STAFF])
        .await?;
    state.services.reservations.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/reservations/summary?start_date=&end_date= — admin only.
async fn summary(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>, AppError> {
    state.services.roles.authorize(caller.user_id, &[ADMIN]).await?;
    let start_date = dto::parse_date(&query.start_date, "start_date")?;
    let end_date = dto::parse_date(&query.end_date, "end_date")?;
    let summary = state
        .services
        .reservations
        .summarize(start_date, end_date)
        .await?;
    Ok(Json(SummaryResponse::from(summary)))
}
