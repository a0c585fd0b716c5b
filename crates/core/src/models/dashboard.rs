use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::reservation::{ReservationStatus, ReservationSummary};

/// Counters shown on the owner dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardCounter {
    Total,
    Pending,
    Cancelled,
}

impl DashboardCounter {
    /// Statuses counted by this counter. A reservation awaiting cancellation
    /// approval already counts as cancelled.
    pub fn statuses(&self) -> Vec<ReservationStatus> {
        match self {
            DashboardCounter::Total => ReservationStatus::ALL.to_vec(),
            DashboardCounter::Pending => vec![ReservationStatus::Pending],
            DashboardCounter::Cancelled => vec![
                ReservationStatus::Cancelled,
                ReservationStatus::CancellationRequested,
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    pub owner_id: Uuid,
    pub statuses: Vec<ReservationStatus>,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub owner_id: Uuid,
    pub total_bookings: i64,
    pub pending: i64,
    pub cancelled: i64,
    pub recent: Vec<ReservationSummary>,
}
