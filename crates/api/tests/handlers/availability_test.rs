use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;
use venuebook_core::models::venue::UnavailableDatesResponse;

use crate::test_utils::{admin, as_actor, guest, TestContext};

fn path(venue_id: Uuid) -> String {
    format!("/venues/{}/unavailable-dates", venue_id)
}

#[tokio::test]
async fn test_owner_replaces_dates_sorted_and_deduplicated() {
    let ctx = TestContext::new().await;

    let response = as_actor(ctx.server.put(&path(ctx.venue.id)), &ctx.owner)
        .json(&json!({ "dates": ["2025-12-31", "2025-12-24", "2025-12-31"] }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["venueId"], json!(ctx.venue.id));
    assert_eq!(body["dates"], json!(["2025-12-24", "2025-12-31"]));

    // A second write replaces the set instead of merging
    as_actor(ctx.server.put(&path(ctx.venue.id)), &ctx.owner)
        .json(&json!({ "dates": ["2026-01-01"] }))
        .await
        .assert_status_ok();

    let response = as_actor(ctx.server.get(&path(ctx.venue.id)), &guest()).await;
    response.assert_status_ok();
    let stored = response.json::<UnavailableDatesResponse>();
    assert_eq!(stored.dates.len(), 1);
    assert_eq!(stored.dates[0].to_string(), "2026-01-01");
}

#[tokio::test]
async fn test_invalid_dates_are_all_reported_and_nothing_changes() {
    let ctx = TestContext::new().await;
    as_actor(ctx.server.put(&path(ctx.venue.id)), &ctx.owner)
        .json(&json!({ "dates": ["2025-12-24"] }))
        .await
        .assert_status_ok();

    let response = as_actor(ctx.server.put(&path(ctx.venue.id)), &ctx.owner)
        .json(&json!({ "dates": ["2025-12-25", "2025-02-30", "tomorrow"] }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json::<Value>()["error"],
        json!("Invalid date(s): 2025-02-30, tomorrow")
    );

    let stored = as_actor(ctx.server.get(&path(ctx.venue.id)), &ctx.owner)
        .await
        .json::<Value>();
    assert_eq!(stored["dates"], json!(["2025-12-24"]));
}

#[tokio::test]
async fn test_empty_list_clears_dates() {
    let ctx = TestContext::new().await;
    as_actor(ctx.server.put(&path(ctx.venue.id)), &ctx.owner)
        .json(&json!({ "dates": ["2025-12-24"] }))
        .await
        .assert_status_ok();

    let response = as_actor(ctx.server.put(&path(ctx.venue.id)), &ctx.owner)
        .json(&json!({ "dates": [] }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["dates"], json!([]));
}

#[tokio::test]
async fn test_only_the_owner_edits_dates() {
    let ctx = TestContext::new().await;

    for actor in [guest(), admin()] {
        as_actor(ctx.server.put(&path(ctx.venue.id)), &actor)
            .json(&json!({ "dates": ["2025-12-24"] }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_unknown_venue_is_not_found() {
    let ctx = TestContext::new().await;

    as_actor(ctx.server.put(&path(Uuid::new_v4())), &ctx.owner)
        .json(&json!({ "dates": ["2025-12-24"] }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    as_actor(ctx.server.get(&path(Uuid::new_v4())), &ctx.owner)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
