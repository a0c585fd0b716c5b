//! # VenueBook API
//!
//! HTTP front of the booking engine: reservation requests and transitions,
//! blackout date management and the owner dashboard.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into engine calls
//! - **Middleware**: Caller identity and error-to-status mapping
//! - **Config**: Environment configuration
//!
//! Handlers never touch the database directly. They call the
//! [`BookingEngine`], which owns every rule and delegates persistence to its
//! store.

/// Configuration module for API settings
pub mod config;
/// Extractors with JSON rejections
pub mod extract;
/// Request handlers
pub mod handlers;
/// Caller identity and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    Router,
};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use venuebook_core::engine::BookingEngine;

use crate::middleware::auth::{USER_ID_HEADER, USER_ROLE_HEADER};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub engine: BookingEngine,
    /// Default size of recent-activity lists
    pub recent_limit: i64,
}

impl ApiState {
    pub fn new(engine: BookingEngine, recent_limit: i64) -> Self {
        Self {
            engine,
            recent_limit,
        }
    }
}

/// Builds the router with every endpoint and the tracing layer attached.
///
/// Kept separate from [`start_server`] so tests can drive it in-process.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Reservation requests and lifecycle transitions
        .merge(routes::reservation::routes())
        // Venue blackout dates
        .merge(routes::venue::routes())
        // Owner dashboard
        .merge(routes::owner::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(USER_ROLE_HEADER),
        ])
        .allow_origin(allowed)
        .allow_credentials(true)
}

/// Starts the API server with the provided configuration and engine
///
/// Logging must already be initialized by the caller.
///
/// # Example
///
/// ```no_run
/// # async fn run(engine: venuebook_core::engine::BookingEngine) -> eyre::Result<()> {
/// let config = venuebook_api::config::ApiConfig::from_env()?;
/// venuebook_api::start_server(config, engine).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, engine: BookingEngine) -> Result<()> {
    let state = Arc::new(ApiState::new(engine, config.recent_limit));
    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) if !origins.is_empty() => app.layer(cors_layer(origins)),
        _ => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(axum::error_handling::HandleErrorLayer::new(
                |_: tower::BoxError| async { axum::http::StatusCode::REQUEST_TIMEOUT },
            ))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
