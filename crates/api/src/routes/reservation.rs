use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/reservations",
            post(handlers::reservation::create_reservation),
        )
        .route(
            "/reservations/:id",
            get(handlers::reservation::get_reservation),
        )
        .route(
            "/reservations/:id/transition",
            post(handlers::reservation::transition_reservation),
        )
        .route(
            "/users/:id/reservations",
            get(handlers::reservation::list_user_reservations),
        )
}
