//! # API Configuration Module
//!
//! Loads the server configuration from environment variables, with defaults
//! where one makes sense.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Whole-request timeout (default: 30)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
//! - `DATABASE_ACQUIRE_TIMEOUT_SECONDS`: Wait for a pooled connection (default: 5)
//! - `DATABASE_OPERATION_TIMEOUT_SECONDS`: Bound on each storage operation (default: 5)
//! - `RECENT_RESERVATIONS_LIMIT`: Default size of the dashboard's recent list (default: 10)

use eyre::{Result, WrapErr, eyre};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// Configuration for the booking API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use venuebook_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    pub database_max_connections: u32,

    /// Seconds to wait for a pooled connection
    pub database_acquire_timeout: u64,

    /// Seconds any single storage operation may take
    pub database_operation_timeout: u64,

    /// Number of entries in the dashboard's recent list
    pub recent_limit: i64,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - A numeric setting is present but cannot be parsed
    /// - `RECENT_RESERVATIONS_LIMIT` is below 1
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Same as [`ApiConfig::from_env`], reading variables through `var`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Network settings
        let host = var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_var(&var, "API_PORT", 3000u16)?;

        // Database settings
        let database_url =
            var("DATABASE_URL").ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;
        let database_max_connections = parse_var(&var, "DATABASE_MAX_CONNECTIONS", 5u32)?;
        let database_acquire_timeout =
            parse_var(&var, "DATABASE_ACQUIRE_TIMEOUT_SECONDS", 5u64)?;
        let database_operation_timeout =
            parse_var(&var, "DATABASE_OPERATION_TIMEOUT_SECONDS", 5u64)?;

        // Logging settings
        let log_level = parse_log_level(&var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()));

        // CORS settings
        let cors_origins = var("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = var("API_REQUEST_TIMEOUT_SECONDS")
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(30);

        let recent_limit = parse_var(&var, "RECENT_RESERVATIONS_LIMIT", 10i64)?;
        if recent_limit < 1 {
            return Err(eyre!("RECENT_RESERVATIONS_LIMIT must be at least 1"));
        }

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            database_max_connections,
            database_acquire_timeout,
            database_operation_timeout,
            recent_limit,
        })
    }

    /// Returns the server address as a string, e.g. "127.0.0.1:8080"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.database_acquire_timeout)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.database_operation_timeout)
    }
}

/// Unknown names fall back to `INFO`.
pub fn parse_log_level(value: &str) -> Level {
    match value.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn parse_var<T>(var: impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .wrap_err_with(|| format!("Invalid {} value", name)),
        None => Ok(default),
    }
}
