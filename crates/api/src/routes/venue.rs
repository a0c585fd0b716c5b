use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/venues/:id/unavailable-dates",
        get(handlers::availability::get_unavailable_dates)
            .put(handlers::availability::set_unavailable_dates),
    )
}
