use axum::http::StatusCode;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use uuid::Uuid;
use venuebook_api::middleware::error_handling::{map_error, status_for};
use venuebook_core::{
    errors::BookingError,
    models::reservation::{ReservationAction, ReservationStatus},
};

use crate::test_utils::{as_actor, TestContext};

fn june_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

#[rstest]
#[case(BookingError::NotFound("Venue".into()), StatusCode::NOT_FOUND)]
#[case(BookingError::Validation("limit".into()), StatusCode::BAD_REQUEST)]
#[case(BookingError::Authentication("missing".into()), StatusCode::UNAUTHORIZED)]
#[case(BookingError::Unauthorized("stranger".into()), StatusCode::FORBIDDEN)]
#[case(BookingError::InvalidDate(vec!["2025-02-30".into()]), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(BookingError::VenueClosed(Uuid::nil()), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(
    BookingError::DateUnavailable { venue_id: Uuid::nil(), date: june_first() },
    StatusCode::UNPROCESSABLE_ENTITY
)]
#[case(
    BookingError::SlotTaken { venue_id: Uuid::nil(), date: june_first() },
    StatusCode::CONFLICT
)]
#[case(
    BookingError::InvalidTransition {
        from: ReservationStatus::Completed,
        action: ReservationAction::Cancel,
    },
    StatusCode::CONFLICT
)]
#[case(BookingError::Conflict("lost update".into()), StatusCode::CONFLICT)]
#[case(BookingError::StorageUnavailable("pool".into()), StatusCode::SERVICE_UNAVAILABLE)]
#[case(BookingError::Database(eyre::eyre!("boom")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: BookingError, #[case] expected: StatusCode) {
    assert_eq!(status_for(&error), expected);
    assert_eq!(map_error(error).status(), expected);
}

#[tokio::test]
async fn test_internal_errors_hide_details() {
    let response = map_error(BookingError::Database(eyre::eyre!(
        "relation \"reservation\" does not exist"
    )));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(
        body,
        json!({ "error": "Internal server error", "retryable": false })
    );
}

#[tokio::test]
async fn test_conflict_body_is_retryable() {
    let response = map_error(BookingError::Conflict("Reservation changed".into()));
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["retryable"], json!(true));
    assert_eq!(body["error"], json!("Concurrent modification: Reservation changed"));
}

#[test_log::test(tokio::test)]
async fn test_malformed_user_id_is_unauthenticated() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .get(&format!("/owners/{}/dashboard", ctx.owner.id))
        .add_header(
            axum::http::HeaderName::from_static("x-user-id"),
            axum::http::HeaderValue::from_static("not-a-uuid"),
        )
        .add_header(
            axum::http::HeaderName::from_static("x-user-role"),
            axum::http::HeaderValue::from_static("client"),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["retryable"], json!(false));
}

#[tokio::test]
async fn test_owner_role_alias_is_accepted() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .get(&format!("/owners/{}/dashboard", ctx.owner.id))
        .add_header(
            axum::http::HeaderName::from_static("x-user-id"),
            axum::http::HeaderValue::from_str(&ctx.owner.id.to_string()).unwrap(),
        )
        .add_header(
            axum::http::HeaderName::from_static("x-user-role"),
            axum::http::HeaderValue::from_static("Owner"),
        )
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_health_endpoints_need_no_identity() {
    let ctx = TestContext::new().await;

    let health = ctx.server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.json::<Value>(), json!({ "status": "ok" }));

    let version = ctx.server.get("/version").await;
    version.assert_status_ok();
    assert_eq!(version.json::<Value>()["service"], json!("venuebook-api"));
}

#[rstest]
#[case("/owners/not-a-uuid/reservations")]
#[case("/reservations/42")]
#[case("/venues/riverside/unavailable-dates")]
#[tokio::test]
async fn test_malformed_path_id_has_json_error_body(#[case] path: &str) {
    let ctx = TestContext::new().await;

    let response = as_actor(ctx.server.get(path), &ctx.owner).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert_eq!(body["retryable"], json!(false));
}

#[tokio::test]
async fn test_malformed_query_has_json_error_body() {
    let ctx = TestContext::new().await;

    let response = as_actor(
        ctx.server
            .get(&format!("/owners/{}/reservations/recent", ctx.owner.id))
            .add_query_param("limit", "many"),
        &ctx.owner,
    )
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["retryable"], json!(false));
}
