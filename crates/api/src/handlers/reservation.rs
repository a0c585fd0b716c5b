use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use venuebook_core::{
    calendar,
    errors::BookingError,
    models::reservation::{
        CreateReservationRequest, CreateReservationResponse, Reservation, TransitionRequest,
        TransitionResponse,
    },
};

use crate::{
    extract::ApiPath,
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

/// Turns a body the extractor could not read into a validation error.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError(BookingError::Validation(rejection.body_text())))
}

/// `POST /reservations`
///
/// Requests a venue for a date. Responds `201` with the new reservation's id
/// and its `pending` status.
#[axum::debug_handler]
pub async fn create_reservation(
    State(state): State<Arc<ApiState>>,
    CurrentUser(actor): CurrentUser,
    payload: Result<Json<CreateReservationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateReservationResponse>), AppError> {
    let payload = json_body(payload)?;
    let event_date = calendar::parse_event_date(&payload.event_date)?;

    let reservation = state
        .engine
        .create_reservation(&actor, payload.venue_id, event_date)
        .await?;

    let response = CreateReservationResponse {
        id: reservation.id,
        status: reservation.status,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /reservations/:id/transition`
#[axum::debug_handler]
pub async fn transition_reservation(
    State(state): State<Arc<ApiState>>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<TransitionResponse>, AppError> {
    let payload = json_body(payload)?;

    let status = state.engine.transition(&actor, id, payload.action).await?;

    Ok(Json(TransitionResponse { id, status }))
}

#[axum::debug_handler]
pub async fn get_reservation(
    State(state): State<Arc<ApiState>>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Reservation>, AppError> {
    let reservation = state.engine.get_reservation(&actor, id).await?;
    Ok(Json(reservation))
}

/// `GET /users/:id/reservations`, the requester's own bookings.
#[axum::debug_handler]
pub async fn list_user_reservations(
    State(state): State<Arc<ApiState>>,
    CurrentUser(actor): CurrentUser,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let reservations = state.engine.list_for_requester(&actor, user_id).await?;
    Ok(Json(reservations))
}
