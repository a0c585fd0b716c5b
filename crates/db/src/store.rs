use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{error, warn};
use uuid::Uuid;
use venuebook_core::errors::{BookingError, BookingResult};
use venuebook_core::models::dashboard::{DashboardCounter, DashboardSummary};
use venuebook_core::models::reservation::{Reservation, ReservationStatus, ReservationSummary};
use venuebook_core::models::venue::{Venue, VenueStatus};
use venuebook_core::store::ReservationStore;

use crate::models::convert_all;
use crate::repositories::{reporting, reservation, unavailable_date, venue};
use crate::schema::HOLDING_SLOT_INDEX;
use crate::DbPool;

/// Postgres-backed [`ReservationStore`].
///
/// Every operation runs under `operation_timeout`; on expiry the caller gets
/// `StorageUnavailable` and any open transaction is rolled back when dropped.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
    operation_timeout: Duration,
}

impl PgStore {
    pub fn new(pool: DbPool, operation_timeout: Duration) -> Self {
        Self {
            pool,
            operation_timeout,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        work: impl Future<Output = BookingResult<T>>,
    ) -> BookingResult<T> {
        match tokio::time::timeout(self.operation_timeout, work).await {
            Ok(Err(BookingError::Database(report))) => {
                error!(operation, error = %report, "Database operation failed");
                Err(BookingError::Database(report))
            }
            Ok(Err(BookingError::StorageUnavailable(message))) => {
                warn!(operation, %message, "Storage unavailable");
                Err(BookingError::StorageUnavailable(message))
            }
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.operation_timeout.as_millis() as u64,
                    "Database operation timed out"
                );
                Err(BookingError::StorageUnavailable(format!(
                    "{} timed out after {:?}",
                    operation, self.operation_timeout
                )))
            }
        }
    }
}

enum FailureKind {
    Unavailable,
    Serialization,
    Other,
}

/// Maps a database failure onto the engine's error kinds.
///
/// Connection loss and pool exhaustion become `StorageUnavailable`,
/// serialization failures and deadlocks become `Conflict`. Anything else is
/// an internal `Database` error.
pub fn classify_error(report: eyre::Report) -> BookingError {
    let kind = match report.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)) => {
            FailureKind::Unavailable
        }
        Some(sqlx::Error::Database(db)) => match db.code().as_deref() {
            Some("40001" | "40P01") => FailureKind::Serialization,
            Some("57014" | "57P01" | "53300") => FailureKind::Unavailable,
            _ => FailureKind::Other,
        },
        _ => FailureKind::Other,
    };

    match kind {
        FailureKind::Unavailable => BookingError::StorageUnavailable(report.to_string()),
        FailureKind::Serialization => BookingError::Conflict(report.to_string()),
        FailureKind::Other => BookingError::Database(report),
    }
}

fn sql_error(err: sqlx::Error) -> BookingError {
    classify_error(err.into())
}

fn is_holding_slot_violation(report: &eyre::Report) -> bool {
    match report.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db)) => db.constraint() == Some(HOLDING_SLOT_INDEX),
        _ => false,
    }
}

fn status_names(statuses: &[ReservationStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

#[async_trait]
impl ReservationStore for PgStore {
    async fn get_venue(&self, venue_id: Uuid) -> BookingResult<Option<Venue>> {
        self.bounded("get_venue", async {
            let row = venue::get_venue_by_id(&self.pool, venue_id)
                .await
                .map_err(classify_error)?;
            Ok(row.map(Venue::try_from).transpose()?)
        })
        .await
    }

    async fn list_venues_for_owner(
        &self,
        owner_id: Uuid,
        status: Option<VenueStatus>,
    ) -> BookingResult<Vec<Venue>> {
        self.bounded("list_venues_for_owner", async {
            let rows =
                venue::get_venues_by_owner(&self.pool, owner_id, status.map(|s| s.as_str()))
                    .await
                    .map_err(classify_error)?;
            Ok(convert_all(rows)?)
        })
        .await
    }

    async fn get_reservation(&self, reservation_id: Uuid) -> BookingResult<Option<Reservation>> {
        self.bounded("get_reservation", async {
            let row = reservation::get_reservation_by_id(&self.pool, reservation_id)
                .await
                .map_err(classify_error)?;
            Ok(row.map(Reservation::try_from).transpose()?)
        })
        .await
    }

    async fn create_reservation(
        &self,
        venue_id: Uuid,
        requester_id: Uuid,
        event_date: NaiveDate,
    ) -> BookingResult<Reservation> {
        self.bounded("create_reservation", async {
            let mut tx = self.pool.begin().await.map_err(sql_error)?;

            let row = venue::get_venue_for_share(&mut *tx, venue_id)
                .await
                .map_err(classify_error)?
                .ok_or_else(|| {
                    BookingError::NotFound(format!("Venue with ID {} not found", venue_id))
                })?;
            let found = Venue::try_from(row)?;
            if found.status == VenueStatus::Closed {
                return Err(BookingError::VenueClosed(venue_id));
            }

            let blocked = unavailable_date::is_date_unavailable(&mut *tx, venue_id, event_date)
                .await
                .map_err(classify_error)?;
            if blocked {
                return Err(BookingError::DateUnavailable {
                    venue_id,
                    date: event_date,
                });
            }

            let holding = reservation::count_holding(&mut *tx, venue_id, event_date)
                .await
                .map_err(classify_error)?;
            if holding > 0 {
                return Err(BookingError::SlotTaken {
                    venue_id,
                    date: event_date,
                });
            }

            // A concurrent insert that passed the check above still trips the index
            let created = match reservation::create_reservation(
                &mut *tx,
                venue_id,
                requester_id,
                event_date,
            )
            .await
            {
                Ok(row) => row,
                Err(report) if is_holding_slot_violation(&report) => {
                    return Err(BookingError::SlotTaken {
                        venue_id,
                        date: event_date,
                    });
                }
                Err(report) => return Err(classify_error(report)),
            };

            tx.commit().await.map_err(sql_error)?;
            Ok(Reservation::try_from(created)?)
        })
        .await
    }

    async fn update_status(
        &self,
        reservation_id: Uuid,
        expected: ReservationStatus,
        to: ReservationStatus,
    ) -> BookingResult<bool> {
        self.bounded("update_status", async {
            match reservation::update_status_if(
                &self.pool,
                reservation_id,
                expected.as_str(),
                to.as_str(),
            )
            .await
            {
                Ok(updated) => Ok(updated),
                Err(report) if is_holding_slot_violation(&report) => {
                    let row = reservation::get_reservation_by_id(&self.pool, reservation_id)
                        .await
                        .map_err(classify_error)?
                        .ok_or_else(|| {
                            BookingError::NotFound(format!(
                                "Reservation with ID {} not found",
                                reservation_id
                            ))
                        })?;
                    Err(BookingError::SlotTaken {
                        venue_id: row.venue_id,
                        date: row.event_date,
                    })
                }
                Err(report) => Err(classify_error(report)),
            }
        })
        .await
    }

    async fn holding_count(&self, venue_id: Uuid, event_date: NaiveDate) -> BookingResult<i64> {
        self.bounded("holding_count", async {
            reservation::count_holding(&self.pool, venue_id, event_date)
                .await
                .map_err(classify_error)
        })
        .await
    }

    async fn replace_unavailable_dates(
        &self,
        venue_id: Uuid,
        dates: Vec<NaiveDate>,
    ) -> BookingResult<()> {
        self.bounded("replace_unavailable_dates", async {
            let mut tx = self.pool.begin().await.map_err(sql_error)?;

            unavailable_date::delete_unavailable_dates_by_venue_id(&mut *tx, venue_id)
                .await
                .map_err(classify_error)?;
            if !dates.is_empty() {
                unavailable_date::insert_unavailable_dates(&mut *tx, venue_id, &dates)
                    .await
                    .map_err(classify_error)?;
            }

            tx.commit().await.map_err(sql_error)?;
            Ok(())
        })
        .await
    }

    async fn unavailable_dates(&self, venue_id: Uuid) -> BookingResult<Vec<NaiveDate>> {
        self.bounded("unavailable_dates", async {
            unavailable_date::get_unavailable_dates_by_venue_id(&self.pool, venue_id)
                .await
                .map_err(classify_error)
        })
        .await
    }

    async fn is_date_blocked(&self, venue_id: Uuid, date: NaiveDate) -> BookingResult<bool> {
        self.bounded("is_date_blocked", async {
            unavailable_date::is_date_unavailable(&self.pool, venue_id, date)
                .await
                .map_err(classify_error)
        })
        .await
    }

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        statuses: Vec<ReservationStatus>,
    ) -> BookingResult<Vec<Reservation>> {
        let names = status_names(&statuses);
        self.bounded("list_for_owner", async {
            let rows = reservation::get_reservations_by_owner(&self.pool, owner_id, &names)
                .await
                .map_err(classify_error)?;
            Ok(convert_all(rows)?)
        })
        .await
    }

    async fn list_for_requester(&self, requester_id: Uuid) -> BookingResult<Vec<Reservation>> {
        self.bounded("list_for_requester", async {
            let rows = reservation::get_reservations_by_requester(&self.pool, requester_id)
                .await
                .map_err(classify_error)?;
            Ok(convert_all(rows)?)
        })
        .await
    }

    async fn count_by_status(
        &self,
        owner_id: Uuid,
        statuses: Vec<ReservationStatus>,
    ) -> BookingResult<i64> {
        let names = status_names(&statuses);
        self.bounded("count_by_status", async {
            reporting::count_by_status(&self.pool, owner_id, &names)
                .await
                .map_err(classify_error)
        })
        .await
    }

    async fn recent_for_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
    ) -> BookingResult<Vec<ReservationSummary>> {
        self.bounded("recent_for_owner", async {
            let rows = reporting::recent_for_owner(&self.pool, owner_id, limit)
                .await
                .map_err(classify_error)?;
            Ok(convert_all(rows)?)
        })
        .await
    }

    async fn dashboard_summary(
        &self,
        owner_id: Uuid,
        recent_limit: i64,
    ) -> BookingResult<DashboardSummary> {
        let pending = status_names(&DashboardCounter::Pending.statuses());
        let cancelled = status_names(&DashboardCounter::Cancelled.statuses());
        self.bounded("dashboard_summary", async {
            let mut tx = self.pool.begin().await.map_err(sql_error)?;
            reporting::begin_snapshot(&mut *tx)
                .await
                .map_err(classify_error)?;

            let counts = reporting::dashboard_counts(&mut *tx, owner_id, &pending, &cancelled)
                .await
                .map_err(classify_error)?;
            let rows = reporting::recent_for_owner(&mut *tx, owner_id, recent_limit)
                .await
                .map_err(classify_error)?;

            tx.commit().await.map_err(sql_error)?;
            Ok(DashboardSummary {
                owner_id,
                total_bookings: counts.total_bookings,
                pending: counts.pending,
                cancelled: counts.cancelled,
                recent: convert_all(rows)?,
            })
        })
        .await
    }
}
