use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::reservation::{ReservationAction, ReservationStatus};

/// Outcome of a successful engine operation, published to dashboard and
/// notification subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReservationEvent {
    Created {
        reservation_id: Uuid,
        venue_id: Uuid,
        requester_id: Uuid,
        event_date: NaiveDate,
    },
    Transitioned {
        reservation_id: Uuid,
        venue_id: Uuid,
        actor_id: Uuid,
        action: ReservationAction,
        from: ReservationStatus,
        to: ReservationStatus,
    },
    UnavailableDatesReplaced {
        venue_id: Uuid,
        dates: Vec<NaiveDate>,
    },
}
