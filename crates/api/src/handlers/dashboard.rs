//! # Owner Dashboard Handlers
//!
//! Read-only views over the reservations on one owner's venues. Callers must
//! be that owner or an admin.

use axum::{
    extract::State,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use venuebook_core::{
    errors::BookingError,
    models::{
        dashboard::{CountResponse, DashboardSummary},
        reservation::{parse_status_list, Reservation, ReservationStatus, ReservationSummary},
        venue::{Venue, VenueStatus},
    },
};

use crate::{
    extract::{ApiPath, ApiQuery},
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

/// `?status=a,b` filter shared by the list and count endpoints
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

fn statuses_from(query: &StatusQuery) -> Result<Option<Vec<ReservationStatus>>, AppError> {
    query
        .status
        .as_deref()
        .map(|raw| parse_status_list(raw).map_err(|e| AppError(BookingError::Validation(e))))
        .transpose()
}

/// Reservations on the owner's venues, newest first. Without a `status`
/// filter every status is returned.
#[axum::debug_handler]
pub async fn list_owner_reservations(
    State(state): State<Arc<ApiState>>,
    CurrentUser(actor): CurrentUser,
    ApiPath(owner_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let statuses = statuses_from(&query)?.unwrap_or_default();
    let reservations = state
        .engine
        .list_for_owner(&actor, owner_id, statuses)
        .await?;
    Ok(Json(reservations))
}

/// Counts reservations whose status is in the `status` set. Omitting the
/// filter counts every reservation; an empty filter counts nothing.
#[axum::debug_handler]
pub async fn count_owner_reservations(
    State(state): State<Arc<ApiState>>,
    CurrentUser(actor): CurrentUser,
    ApiPath(owner_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> Result<Json<CountResponse>, AppError> {
    let statuses =
        statuses_from(&query)?.unwrap_or_else(|| ReservationStatus::ALL.to_vec());
    let count = state
        .engine
        .count_by_status(&actor, owner_id, statuses.clone())
        .await?;

    Ok(Json(CountResponse {
        owner_id,
        statuses,
        count,
    }))
}

#[axum::debug_handler]
pub async fn recent_owner_reservations(
    State(state): State<Arc<ApiState>>,
    CurrentUser(actor): CurrentUser,
    ApiPath(owner_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<RecentQuery>,
) -> Result<Json<Vec<ReservationSummary>>, AppError> {
    let limit = query.limit.unwrap_or(state.recent_limit);
    let recent = state
        .engine
        .recent_for_owner(&actor, owner_id, limit)
        .await?;
    Ok(Json(recent))
}

/// Total, pending and cancelled counters plus recent activity.
#[axum::debug_handler]
pub async fn dashboard_summary(
    State(state): State<Arc<ApiState>>,
    CurrentUser(actor): CurrentUser,
    ApiPath(owner_id): ApiPath<Uuid>,
) -> Result<Json<DashboardSummary>, AppError> {
    let summary = state
        .engine
        .dashboard_summary(&actor, owner_id, state.recent_limit)
        .await?;
    Ok(Json(summary))
}

#[derive(Debug, Default, Deserialize)]
pub struct VenueQuery {
    pub status: Option<String>,
}

#[axum::debug_handler]
pub async fn list_owner_venues(
    State(state): State<Arc<ApiState>>,
    CurrentUser(actor): CurrentUser,
    ApiPath(owner_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<VenueQuery>,
) -> Result<Json<Vec<Venue>>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(|raw| {
            raw.parse::<VenueStatus>()
                .map_err(|e| AppError(BookingError::Validation(e)))
        })
        .transpose()?;

    let venues = state
        .engine
        .list_venues_for_owner(&actor, owner_id, status)
        .await?;
    Ok(Json(venues))
}
