use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::reservation::{ReservationAction, ReservationStatus};

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Unauthorized(String),

    #[error("Venue {0} is closed and does not accept reservations")]
    VenueClosed(Uuid),

    #[error("Venue {venue_id} is unavailable on {date}")]
    DateUnavailable { venue_id: Uuid, date: NaiveDate },

    #[error("Venue {venue_id} is already reserved on {date}")]
    SlotTaken { venue_id: Uuid, date: NaiveDate },

    #[error("Invalid date(s): {}", .0.join(", "))]
    InvalidDate(Vec<String>),

    #[error("Cannot {action} a reservation that is {from}")]
    InvalidTransition {
        from: ReservationStatus,
        action: ReservationAction,
    },

    #[error("Concurrent modification: {0}")]
    Conflict(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),
}

impl BookingError {
    /// Whether a caller may retry the request after re-reading state.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BookingError::Conflict(_) | BookingError::StorageUnavailable(_)
        )
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
