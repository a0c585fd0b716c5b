use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tracing_subscriber::FmtSubscriber;
use venuebook_api::config::ApiConfig;
use venuebook_core::engine::BookingEngine;
use venuebook_db::{create_pool, schema::initialize_database, PgStore, PoolSettings};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create database connection pool
    let settings = PoolSettings {
        max_connections: config.database_max_connections,
        acquire_timeout: config.acquire_timeout(),
    };
    let db_pool = create_pool(&config.database_url, &settings).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    let store = PgStore::new(db_pool, config.operation_timeout());
    let engine = BookingEngine::new(Arc::new(store));

    // Mirror lifecycle events into the log
    let mut events = engine.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => debug!(?event, "reservation event"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "event log fell behind"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    info!(
        max_connections = settings.max_connections,
        operation_timeout_secs = config.database_operation_timeout,
        "Booking engine ready"
    );

    // Start API server
    venuebook_api::start_server(config, engine).await?;

    Ok(())
}
