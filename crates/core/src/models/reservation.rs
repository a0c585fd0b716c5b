use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a reservation. The string forms are the ones persisted in the
/// `reservation.status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Accepted,
    Confirmed,
    Rejected,
    Cancelled,
    CancellationRequested,
    Completed,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 7] = [
        ReservationStatus::Pending,
        ReservationStatus::Accepted,
        ReservationStatus::Confirmed,
        ReservationStatus::Rejected,
        ReservationStatus::Cancelled,
        ReservationStatus::CancellationRequested,
        ReservationStatus::Completed,
    ];

    /// Statuses that occupy a slot and block other requests for the same date.
    pub const HOLDING: [ReservationStatus; 3] = [
        ReservationStatus::Pending,
        ReservationStatus::Accepted,
        ReservationStatus::Confirmed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Accepted => "accepted",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Rejected => "rejected",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::CancellationRequested => "cancellation_requested",
            ReservationStatus::Completed => "completed",
        }
    }

    pub fn is_holding(&self) -> bool {
        Self::HOLDING.contains(self)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Rejected | ReservationStatus::Cancelled | ReservationStatus::Completed
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown reservation status '{}'", s))
    }
}

/// Parses a comma-separated status list such as `cancelled,cancellation_requested`.
pub fn parse_status_list(raw: &str) -> Result<Vec<ReservationStatus>, String> {
    let mut statuses = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let status = part.parse::<ReservationStatus>()?;
        if !statuses.contains(&status) {
            statuses.push(status);
        }
    }
    Ok(statuses)
}

/// Something a party can do to a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationAction {
    Accept,
    Reject,
    Confirm,
    Cancel,
    Complete,
    RequestCancellation,
    ApproveCancellation,
    DenyCancellation,
}

impl ReservationAction {
    pub const ALL: [ReservationAction; 8] = [
        ReservationAction::Accept,
        ReservationAction::Reject,
        ReservationAction::Confirm,
        ReservationAction::Cancel,
        ReservationAction::Complete,
        ReservationAction::RequestCancellation,
        ReservationAction::ApproveCancellation,
        ReservationAction::DenyCancellation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationAction::Accept => "accept",
            ReservationAction::Reject => "reject",
            ReservationAction::Confirm => "confirm",
            ReservationAction::Cancel => "cancel",
            ReservationAction::Complete => "complete",
            ReservationAction::RequestCancellation => "request_cancellation",
            ReservationAction::ApproveCancellation => "approve_cancellation",
            ReservationAction::DenyCancellation => "deny_cancellation",
        }
    }
}

impl fmt::Display for ReservationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub requester_id: Uuid,
    pub event_date: NaiveDate,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

/// A reservation as shown on an owner's recent-activity panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationSummary {
    pub id: Uuid,
    pub event_date: NaiveDate,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub venue_id: Uuid,
    pub venue_title: String,
    pub requester_id: Uuid,
    pub requester_username: Option<String>,
    pub requester_email: Option<String>,
}

/// `event_date` is kept raw so a malformed value is reported as an invalid
/// date rather than a body rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub venue_id: Uuid,
    pub event_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationResponse {
    pub id: Uuid,
    pub status: ReservationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub action: ReservationAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionResponse {
    pub id: Uuid,
    pub status: ReservationStatus,
}
