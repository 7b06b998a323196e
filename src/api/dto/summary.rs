//! Close-out summary DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::dto::ReservationDetailResponse;
use crate::services::ReservationSummary;

/// Query parameters for the close-out report. Both dates are required
/// calendar dates (`YYYY-MM-DD`), inclusive.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SummaryQuery {
    pub start_date: String,
    pub end_date: String,
}

/// Cash-register close-out over a date range.
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub completed_count: usize,
    /// Exact decimal total of completed reservations.
    pub completed_total: String,
    pub completed: Vec<ReservationDetailResponse>,
    pub pending_count: usize,
    pub pending_total: String,
    pub pending: Vec<ReservationDetailResponse>,
}

impl From<ReservationSummary> for SummaryResponse {
    fn from(summary: ReservationSummary) -> Self {
        Self {
            completed_count: summary.completed_count,
            completed_total: summary.completed_total.to_string(),
            completed: summary
                .completed
                .into_iter()
                .map(|detail| ReservationDetailResponse::from_detail(detail, Vec::new()))
                .collect(),
            pending_count: summary.pending_count,
            pending_total: summary.pending_total.to_string(),
            pending: summary
                .pending
                .into_iter()
                .map(|detail| ReservationDetailResponse::from_detail(detail, Vec::new()))
                .collect(),
        }
    }
}
