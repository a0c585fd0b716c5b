//! # Authentication Module
//!
//! Identity is established upstream by the auth gateway, which forwards the
//! caller as two headers. [`CurrentUser`] turns them into an [`Actor`] and
//! rejects the request with `401` when either is missing or malformed.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;
use venuebook_core::{
    errors::BookingError,
    models::user::{Actor, UserRole},
};

use crate::middleware::error_handling::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The authenticated caller of a request.
///
/// # Example
///
/// ```ignore
/// async fn handler(CurrentUser(actor): CurrentUser) -> String {
///     format!("{} as {}", actor.id, actor.role)
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Actor);

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            AppError(BookingError::Authentication(format!(
                "Missing or unreadable {} header",
                name
            )))
        })
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = Uuid::parse_str(header(parts, USER_ID_HEADER)?).map_err(|_| {
            AppError(BookingError::Authentication(
                "User ID header is not a valid UUID".to_string(),
            ))
        })?;
        let role = header(parts, USER_ROLE_HEADER)?
            .parse::<UserRole>()
            .map_err(|e| AppError(BookingError::Authentication(e)))?;

        Ok(CurrentUser(Actor::new(id, role)))
    }
}
