use chrono::{DateTime, NaiveDate, Utc};
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use venuebook_core::models::{
    reservation::{Reservation, ReservationSummary},
    venue::Venue,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbVenue {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReservation {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub requester_id: Uuid,
    pub event_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Reservation joined with its venue title and booker identity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReservationSummary {
    pub id: Uuid,
    pub event_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub venue_id: Uuid,
    pub venue_title: String,
    pub requester_id: Uuid,
    pub requester_username: Option<String>,
    pub requester_email: Option<String>,
}

/// Dashboard counters computed by one aggregate query.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct DbDashboardCounts {
    pub total_bookings: i64,
    pub pending: i64,
    pub cancelled: i64,
}

impl TryFrom<DbVenue> for Venue {
    type Error = eyre::Report;

    fn try_from(row: DbVenue) -> Result<Self> {
        Ok(Venue {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            status: row.status.parse().map_err(|e: String| eyre!(e))?,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DbReservation> for Reservation {
    type Error = eyre::Report;

    fn try_from(row: DbReservation) -> Result<Self> {
        Ok(Reservation {
            id: row.id,
            venue_id: row.venue_id,
            requester_id: row.requester_id,
            event_date: row.event_date,
            status: row.status.parse().map_err(|e: String| eyre!(e))?,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DbReservationSummary> for ReservationSummary {
    type Error = eyre::Report;

    fn try_from(row: DbReservationSummary) -> Result<Self> {
        Ok(ReservationSummary {
            id: row.id,
            event_date: row.event_date,
            status: row.status.parse().map_err(|e: String| eyre!(e))?,
            created_at: row.created_at,
            venue_id: row.venue_id,
            venue_title: row.venue_title,
            requester_id: row.requester_id,
            requester_username: row.requester_username,
            requester_email: row.requester_email,
        })
    }
}

/// Converts a batch of rows, failing on the first unreadable one.
pub fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = eyre::Report>,
{
    rows.into_iter().map(T::try_from).collect()
}
