//! Persistence seam of the booking engine.
//!
//! Implementations own the transactional guarantees: the engine is stateless
//! and relies on each method below being atomic on its own.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::BookingResult;
use crate::models::dashboard::DashboardSummary;
use crate::models::reservation::{Reservation, ReservationStatus, ReservationSummary};
use crate::models::venue::{Venue, VenueStatus};

#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn get_venue(&self, venue_id: Uuid) -> BookingResult<Option<Venue>>;

    /// Venues of an owner, newest first, optionally restricted to one status.
    async fn list_venues_for_owner(
        &self,
        owner_id: Uuid,
        status: Option<VenueStatus>,
    ) -> BookingResult<Vec<Venue>>;

    async fn get_reservation(&self, reservation_id: Uuid) -> BookingResult<Option<Reservation>>;

    /// Inserts a `pending` reservation as one atomic unit with its checks.
    ///
    /// Fails with `NotFound` / `VenueClosed` if the venue is missing or closed,
    /// `DateUnavailable` if the date is blacked out and `SlotTaken` if another
    /// reservation already holds the slot. Concurrent calls for the same slot
    /// must not both succeed.
    async fn create_reservation(
        &self,
        venue_id: Uuid,
        requester_id: Uuid,
        event_date: NaiveDate,
    ) -> BookingResult<Reservation>;

    /// Moves a reservation to `to` only if its status is still `expected`.
    ///
    /// Returns `false` when the status changed underneath the caller. Fails
    /// with `SlotTaken` if `to` is a holding status and the slot is held by a
    /// different reservation.
    async fn update_status(
        &self,
        reservation_id: Uuid,
        expected: ReservationStatus,
        to: ReservationStatus,
    ) -> BookingResult<bool>;

    /// Number of reservations currently holding the slot.
    async fn holding_count(&self, venue_id: Uuid, event_date: NaiveDate) -> BookingResult<i64>;

    /// Replaces the venue's blackout set in one transaction.
    async fn replace_unavailable_dates(
        &self,
        venue_id: Uuid,
        dates: Vec<NaiveDate>,
    ) -> BookingResult<()>;

    /// Blackout dates of a venue in ascending order.
    async fn unavailable_dates(&self, venue_id: Uuid) -> BookingResult<Vec<NaiveDate>>;

    async fn is_date_blocked(&self, venue_id: Uuid, date: NaiveDate) -> BookingResult<bool>;

    /// Reservations on the owner's venues, newest first. An empty status list
    /// means every status.
    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        statuses: Vec<ReservationStatus>,
    ) -> BookingResult<Vec<Reservation>>;

    async fn list_for_requester(&self, requester_id: Uuid) -> BookingResult<Vec<Reservation>>;

    async fn count_by_status(
        &self,
        owner_id: Uuid,
        statuses: Vec<ReservationStatus>,
    ) -> BookingResult<i64>;

    async fn recent_for_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
    ) -> BookingResult<Vec<ReservationSummary>>;

    /// Dashboard counters and the `recent_limit` newest reservations, all
    /// read from one snapshot so the figures agree with each other.
    async fn dashboard_summary(
        &self,
        owner_id: Uuid,
        recent_limit: i64,
    ) -> BookingResult<DashboardSummary>;
}
