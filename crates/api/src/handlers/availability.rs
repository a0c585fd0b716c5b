//! # Availability Handlers
//!
//! Owners maintain a set of blackout dates per venue. A write replaces the
//! whole set; a date on the list cannot be requested.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use venuebook_core::models::venue::{SetUnavailableDatesRequest, UnavailableDatesResponse};

use crate::{
    extract::ApiPath,
    handlers::reservation::json_body,
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

/// Replaces the venue's unavailable dates.
///
/// # Endpoint
///
/// ```text
/// PUT /venues/:id/unavailable-dates
/// {"dates": ["2025-12-24", "2025-12-25"]}
/// ```
///
/// # Errors
///
/// * `Unauthorized` - The caller does not own the venue
/// * `InvalidDate` - One or more entries are not `YYYY-MM-DD`; every bad entry
///   is listed and the stored set is left unchanged
/// * `NotFound` - Unknown venue
#[axum::debug_handler]
pub async fn set_unavailable_dates(
    State(state): State<Arc<ApiState>>,
    CurrentUser(actor): CurrentUser,
    ApiPath(venue_id): ApiPath<Uuid>,
    payload: Result<Json<SetUnavailableDatesRequest>, JsonRejection>,
) -> Result<Json<UnavailableDatesResponse>, AppError> {
    let payload = json_body(payload)?;

    let dates = state
        .engine
        .set_unavailable_dates(&actor, venue_id, &payload.dates)
        .await?;

    Ok(Json(UnavailableDatesResponse { venue_id, dates }))
}

/// Current blackout dates in ascending order. Any signed-in user may read them.
#[axum::debug_handler]
pub async fn get_unavailable_dates(
    State(state): State<Arc<ApiState>>,
    CurrentUser(_actor): CurrentUser,
    ApiPath(venue_id): ApiPath<Uuid>,
) -> Result<Json<UnavailableDatesResponse>, AppError> {
    let dates = state.engine.unavailable_dates(venue_id).await?;
    Ok(Json(UnavailableDatesResponse { venue_id, dates }))
}
