use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/owners/:id/reservations",
            get(handlers::dashboard::list_owner_reservations),
        )
        .route(
            "/owners/:id/reservations/count",
            get(handlers::dashboard::count_owner_reservations),
        )
        .route(
            "/owners/:id/reservations/recent",
            get(handlers::dashboard::recent_owner_reservations),
        )
        .route(
            "/owners/:id/dashboard",
            get(handlers::dashboard::dashboard_summary),
        )
        .route(
            "/owners/:id/venues",
            get(handlers::dashboard::list_owner_venues),
        )
}
