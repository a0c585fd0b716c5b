//! # Error Handling Middleware
//!
//! Maps booking errors to HTTP status codes and a JSON body of the form
//! `{"error": "...", "retryable": bool}`.

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use venuebook_core::errors::BookingError;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use venuebook_api::middleware::error_handling::AppError;
/// use venuebook_core::errors::BookingError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(BookingError::NotFound("Venue".to_string())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

pub fn status_for(err: &BookingError) -> StatusCode {
    match err {
        BookingError::NotFound(_) => StatusCode::NOT_FOUND,
        BookingError::Validation(_) => StatusCode::BAD_REQUEST,
        BookingError::Authentication(_) => StatusCode::UNAUTHORIZED,
        BookingError::Unauthorized(_) => StatusCode::FORBIDDEN,
        BookingError::InvalidDate(_)
        | BookingError::VenueClosed(_)
        | BookingError::DateUnavailable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        BookingError::SlotTaken { .. }
        | BookingError::InvalidTransition { .. }
        | BookingError::Conflict(_) => StatusCode::CONFLICT,
        BookingError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);

        // Internal details stay in the log
        let message = match &self.0 {
            BookingError::Database(report) => {
                error!(error = ?report, "Request failed with an internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(json!({
            "error": message,
            "retryable": self.0.is_retryable(),
        }));

        (status, body).into_response()
    }
}

/// Allows `?` on `BookingResult` inside handlers.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError(BookingError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(BookingError::Validation(rejection.body_text()))
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}

/// Maps a BookingError to an HTTP response
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
