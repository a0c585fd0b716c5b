use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{NaiveDate, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;
use venuebook_core::{
    errors::BookingError,
    mock::MockStore,
    models::{
        reservation::{
            CreateReservationResponse, Reservation, ReservationStatus, TransitionResponse,
        },
        user::Actor,
        venue::{Venue, VenueStatus},
    },
};

use crate::test_utils::{admin, as_actor, guest, server_for, TestContext};

async fn create(ctx: &TestContext, actor: &Actor, date: &str) -> Uuid {
    let response = as_actor(ctx.server.post("/reservations"), actor)
        .json(&json!({ "venueId": ctx.venue.id, "eventDate": date }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<CreateReservationResponse>().id
}

async fn transition(
    ctx: &TestContext,
    actor: &Actor,
    id: Uuid,
    action: &str,
) -> axum_test::TestResponse {
    as_actor(ctx.server.post(&format!("/reservations/{}/transition", id)), actor)
        .json(&json!({ "action": action }))
        .await
}

#[tokio::test]
async fn test_create_reservation_returns_created_pending() {
    let ctx = TestContext::new().await;

    let response = as_actor(ctx.server.post("/reservations"), &guest())
        .json(&json!({ "venueId": ctx.venue.id, "eventDate": "2025-06-01" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<CreateReservationResponse>();
    assert_eq!(body.status, ReservationStatus::Pending);
}

#[tokio::test]
async fn test_create_reservation_requires_identity() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/reservations")
        .json(&json!({ "venueId": ctx.venue.id, "eventDate": "2025-06-01" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_role_is_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/reservations")
        .add_header(
            axum::http::HeaderName::from_static("x-user-id"),
            axum::http::HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap(),
        )
        .add_header(
            axum::http::HeaderName::from_static("x-user-role"),
            axum::http::HeaderValue::from_static("superuser"),
        )
        .json(&json!({ "venueId": ctx.venue.id, "eventDate": "2025-06-01" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_reservation_rejects_malformed_date() {
    let ctx = TestContext::new().await;

    let response = as_actor(ctx.server.post("/reservations"), &guest())
        .json(&json!({ "venueId": ctx.venue.id, "eventDate": "06/01/2025" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json::<Value>();
    assert_eq!(body["error"], json!("Invalid date(s): 06/01/2025"));
    assert_eq!(body["retryable"], json!(false));
}

#[tokio::test]
async fn test_create_reservation_rejects_unreadable_body() {
    let ctx = TestContext::new().await;

    let response = as_actor(ctx.server.post("/reservations"), &guest())
        .json(&json!({ "venue": "nope" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_second_request_for_slot_conflicts() {
    let ctx = TestContext::new().await;
    create(&ctx, &guest(), "2025-06-01").await;

    let response = as_actor(ctx.server.post("/reservations"), &guest())
        .json(&json!({ "venueId": ctx.venue.id, "eventDate": "2025-06-01" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["retryable"], json!(false));
}

#[tokio::test]
async fn test_closed_venue_and_blackout_are_unprocessable() {
    let ctx = TestContext::new().await;
    let closed = ctx
        .store
        .add_venue(ctx.owner.id, "Boathouse", VenueStatus::Closed)
        .await;

    let response = as_actor(ctx.server.post("/reservations"), &guest())
        .json(&json!({ "venueId": closed.id, "eventDate": "2025-06-01" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    as_actor(
        ctx.server
            .put(&format!("/venues/{}/unavailable-dates", ctx.venue.id)),
        &ctx.owner,
    )
    .json(&json!({ "dates": ["2025-12-25"] }))
    .await
    .assert_status_ok();

    let response = as_actor(ctx.server.post("/reservations"), &guest())
        .json(&json!({ "venueId": ctx.venue.id, "eventDate": "2025-12-25" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_venue_is_not_found() {
    let ctx = TestContext::new().await;

    let response = as_actor(ctx.server.post("/reservations"), &guest())
        .json(&json!({ "venueId": Uuid::new_v4(), "eventDate": "2025-06-01" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_lifecycle_over_http() {
    let ctx = TestContext::new().await;
    let booker = guest();
    let id = create(&ctx, &booker, "2025-06-01").await;

    let response = transition(&ctx, &ctx.owner, id, "accept").await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<TransitionResponse>().status,
        ReservationStatus::Accepted
    );

    transition(&ctx, &ctx.owner, id, "confirm").await.assert_status_ok();
    transition(&ctx, &booker, id, "request_cancellation")
        .await
        .assert_status_ok();

    let response = transition(&ctx, &ctx.owner, id, "approve_cancellation").await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<TransitionResponse>().status,
        ReservationStatus::Cancelled
    );

    // Terminal
    let response = transition(&ctx, &ctx.owner, id, "accept").await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        response.json::<Value>()["error"],
        json!("Cannot accept a reservation that is cancelled")
    );
}

#[tokio::test]
async fn test_requester_cannot_accept_own_request() {
    let ctx = TestContext::new().await;
    let booker = guest();
    let id = create(&ctx, &booker, "2025-06-01").await;

    transition(&ctx, &booker, id, "accept")
        .await
        .assert_status(StatusCode::FORBIDDEN);
    transition(&ctx, &guest(), id, "reject")
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_action_is_bad_request() {
    let ctx = TestContext::new().await;
    let id = create(&ctx, &guest(), "2025-06-01").await;

    transition(&ctx, &ctx.owner, id, "delete")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transition_of_missing_reservation_is_not_found() {
    let ctx = TestContext::new().await;

    transition(&ctx, &ctx.owner, Uuid::new_v4(), "accept")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_reservation_visibility() {
    let ctx = TestContext::new().await;
    let booker = guest();
    let id = create(&ctx, &booker, "2025-06-01").await;
    let path = format!("/reservations/{}", id);

    let response = as_actor(ctx.server.get(&path), &booker).await;
    response.assert_status_ok();
    let reservation = response.json::<Reservation>();
    assert_eq!(reservation.requester_id, booker.id);
    assert_eq!(
        reservation.event_date,
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    );

    as_actor(ctx.server.get(&path), &ctx.owner)
        .await
        .assert_status_ok();
    as_actor(ctx.server.get(&path), &admin())
        .await
        .assert_status_ok();
    as_actor(ctx.server.get(&path), &guest())
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_reservations_are_private() {
    let ctx = TestContext::new().await;
    let booker = guest();
    create(&ctx, &booker, "2025-06-01").await;
    create(&ctx, &booker, "2025-06-02").await;
    let path = format!("/users/{}/reservations", booker.id);

    let response = as_actor(ctx.server.get(&path), &booker).await;
    response.assert_status_ok();
    let listed = response.json::<Vec<Reservation>>();
    assert_eq!(listed.len(), 2);
    assert_eq!(
        listed[0].event_date,
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    );

    as_actor(ctx.server.get(&path), &guest())
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_storage_outage_is_retryable() {
    let owner_id = Uuid::new_v4();
    let venue = Venue {
        id: Uuid::new_v4(),
        owner_id,
        title: "Glasshouse".to_string(),
        status: VenueStatus::Open,
        created_at: Utc::now(),
    };
    let venue_id = venue.id;

    let mut store = MockStore::new();
    store
        .expect_get_venue()
        .returning(move |_| Ok(Some(venue.clone())));
    store.expect_create_reservation().returning(|_, _, _| {
        Err(BookingError::StorageUnavailable(
            "connection pool timed out".to_string(),
        ))
    });
    let server = server_for(Arc::new(store));

    let response = as_actor(server.post("/reservations"), &guest())
        .json(&json!({ "venueId": venue_id, "eventDate": "2025-06-01" }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["retryable"], json!(true));
}
