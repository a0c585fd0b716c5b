use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use uuid::Uuid;
use venuebook_core::models::{
    dashboard::{CountResponse, DashboardSummary},
    reservation::{CreateReservationResponse, Reservation, ReservationStatus},
    user::Actor,
    venue::{Venue, VenueStatus},
};

use crate::test_utils::{admin, as_actor, guest, TestContext, RECENT_LIMIT};

async fn book(ctx: &TestContext, booker: &Actor, date: &str) -> Uuid {
    let response = as_actor(ctx.server.post("/reservations"), booker)
        .json(&json!({ "venueId": ctx.venue.id, "eventDate": date }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<CreateReservationResponse>().id
}

async fn act(ctx: &TestContext, actor: &Actor, id: Uuid, action: &str) {
    as_actor(ctx.server.post(&format!("/reservations/{}/transition", id)), actor)
        .json(&json!({ "action": action }))
        .await
        .assert_status_ok();
}

/// One pending, one cancellation_requested and one cancelled reservation.
async fn seeded() -> TestContext {
    let ctx = TestContext::new().await;
    ctx.store
        .add_user(ctx.owner.id, "owner", "owner@example.com")
        .await;

    book(&ctx, &guest(), "2025-06-01").await;

    let booker = guest();
    let requested = book(&ctx, &booker, "2025-06-02").await;
    act(&ctx, &ctx.owner, requested, "accept").await;
    act(&ctx, &ctx.owner, requested, "confirm").await;
    act(&ctx, &booker, requested, "request_cancellation").await;

    let cancelled = book(&ctx, &guest(), "2025-06-03").await;
    act(&ctx, &ctx.owner, cancelled, "accept").await;
    act(&ctx, &ctx.owner, cancelled, "cancel").await;

    ctx
}

#[tokio::test]
async fn test_dashboard_summary_counts() {
    let ctx = seeded().await;

    let response = as_actor(
        ctx.server.get(&format!("/owners/{}/dashboard", ctx.owner.id)),
        &ctx.owner,
    )
    .await;

    response.assert_status_ok();
    let summary = response.json::<DashboardSummary>();
    assert_eq!(summary.owner_id, ctx.owner.id);
    assert_eq!(summary.total_bookings, 3);
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.cancelled, 2);
    assert_eq!(summary.recent.len(), 3);
    assert_eq!(summary.recent[0].venue_title, "Riverside Barn");
    assert!(summary.recent.len() as i64 <= RECENT_LIMIT);
}

#[rstest]
#[case("pending", 1)]
#[case("cancelled,cancellation_requested", 2)]
#[case("confirmed", 0)]
#[case("", 0)]
#[tokio::test]
async fn test_count_by_status(#[case] filter: &str, #[case] expected: i64) {
    let ctx = seeded().await;

    let response = as_actor(
        ctx.server
            .get(&format!("/owners/{}/reservations/count", ctx.owner.id))
            .add_query_param("status", filter),
        &ctx.owner,
    )
    .await;

    response.assert_status_ok();
    assert_eq!(response.json::<CountResponse>().count, expected);
}

#[tokio::test]
async fn test_count_without_filter_counts_everything() {
    let ctx = seeded().await;

    let response = as_actor(
        ctx.server
            .get(&format!("/owners/{}/reservations/count", ctx.owner.id)),
        &ctx.owner,
    )
    .await;

    response.assert_status_ok();
    let body = response.json::<CountResponse>();
    assert_eq!(body.count, 3);
    assert_eq!(body.statuses.len(), ReservationStatus::ALL.len());
}

#[tokio::test]
async fn test_unknown_status_is_bad_request() {
    let ctx = seeded().await;

    as_actor(
        ctx.server
            .get(&format!("/owners/{}/reservations", ctx.owner.id))
            .add_query_param("status", "pending,archived"),
        &ctx.owner,
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_filters_by_status_newest_first() {
    let ctx = seeded().await;

    let response = as_actor(
        ctx.server
            .get(&format!("/owners/{}/reservations", ctx.owner.id))
            .add_query_param("status", "pending,cancelled"),
        &ctx.owner,
    )
    .await;

    response.assert_status_ok();
    let listed = response.json::<Vec<Reservation>>();
    let statuses: Vec<ReservationStatus> = listed.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![ReservationStatus::Cancelled, ReservationStatus::Pending]
    );

    let all = as_actor(
        ctx.server
            .get(&format!("/owners/{}/reservations", ctx.owner.id)),
        &ctx.owner,
    )
    .await
    .json::<Vec<Reservation>>();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_recent_respects_limit() {
    let ctx = seeded().await;
    let path = format!("/owners/{}/reservations/recent", ctx.owner.id);

    let response = as_actor(ctx.server.get(&path).add_query_param("limit", 2), &ctx.owner).await;
    response.assert_status_ok();
    let recent = response.json::<Value>();
    assert_eq!(recent.as_array().map(Vec::len), Some(2));

    as_actor(ctx.server.get(&path).add_query_param("limit", 0), &ctx.owner)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_owner_views_are_scoped() {
    let ctx = seeded().await;
    let path = format!("/owners/{}/dashboard", ctx.owner.id);

    as_actor(ctx.server.get(&path), &guest())
        .await
        .assert_status(StatusCode::FORBIDDEN);
    as_actor(ctx.server.get(&path), &admin())
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_owner_venues_filter() {
    let ctx = TestContext::new().await;
    ctx.store
        .add_venue(ctx.owner.id, "Old Mill", VenueStatus::Closed)
        .await;
    let path = format!("/owners/{}/venues", ctx.owner.id);

    let all = as_actor(ctx.server.get(&path), &ctx.owner)
        .await
        .json::<Vec<Venue>>();
    assert_eq!(all.len(), 2);

    let closed = as_actor(ctx.server.get(&path).add_query_param("status", "closed"), &ctx.owner)
        .await
        .json::<Vec<Venue>>();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].title, "Old Mill");

    as_actor(ctx.server.get(&path).add_query_param("status", "archived"), &ctx.owner)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
