//! Test doubles for the [`ReservationStore`] seam.
//!
//! [`InMemoryStore`] keeps the same atomicity guarantees as the PostgreSQL
//! store by running each operation under one lock. [`MockStore`] is a
//! `mockall` mock for error-path tests.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use mockall::mock;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::models::dashboard::{DashboardCounter, DashboardSummary};
use crate::models::reservation::{Reservation, ReservationStatus, ReservationSummary};
use crate::models::venue::{Venue, VenueStatus};
use crate::store::ReservationStore;

#[derive(Debug, Clone)]
struct UserRecord {
    username: String,
    email: String,
}

#[derive(Default)]
struct Inner {
    venues: HashMap<Uuid, Venue>,
    users: HashMap<Uuid, UserRecord>,
    // Insertion order doubles as the tie-break for equal timestamps.
    reservations: Vec<Reservation>,
    unavailable: HashMap<Uuid, BTreeSet<NaiveDate>>,
}

impl Inner {
    fn owned_venue_ids(&self, owner_id: Uuid) -> Vec<Uuid> {
        self.venues
            .values()
            .filter(|venue| venue.owner_id == owner_id)
            .map(|venue| venue.id)
            .collect()
    }

    fn holders(&self, venue_id: Uuid, date: NaiveDate) -> impl Iterator<Item = &Reservation> {
        self.reservations.iter().filter(move |r| {
            r.venue_id == venue_id && r.event_date == date && r.status.is_holding()
        })
    }

    fn count(&self, owner_id: Uuid, statuses: &[ReservationStatus]) -> i64 {
        let venue_ids = self.owned_venue_ids(owner_id);
        self.reservations
            .iter()
            .filter(|r| venue_ids.contains(&r.venue_id) && statuses.contains(&r.status))
            .count() as i64
    }

    fn recent(&self, owner_id: Uuid, limit: i64) -> Vec<ReservationSummary> {
        let venue_ids = self.owned_venue_ids(owner_id);
        let recent = Inner::newest_first(
            self.reservations
                .iter()
                .filter(|r| venue_ids.contains(&r.venue_id)),
        );

        recent
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|r| {
                let user = self.users.get(&r.requester_id);
                ReservationSummary {
                    id: r.id,
                    event_date: r.event_date,
                    status: r.status,
                    created_at: r.created_at,
                    venue_id: r.venue_id,
                    venue_title: self
                        .venues
                        .get(&r.venue_id)
                        .map(|venue| venue.title.clone())
                        .unwrap_or_default(),
                    requester_id: r.requester_id,
                    requester_username: user.map(|u| u.username.clone()),
                    requester_email: user.map(|u| u.email.clone()),
                }
            })
            .collect()
    }

    fn newest_first<'a>(items: impl DoubleEndedIterator<Item = &'a Reservation>) -> Vec<Reservation> {
        let mut out: Vec<Reservation> = items.rev().cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_venue(&self, owner_id: Uuid, title: &str, status: VenueStatus) -> Venue {
        let venue = Venue {
            id: Uuid::new_v4(),
            owner_id,
            title: title.to_string(),
            status,
            created_at: Utc::now(),
        };
        self.inner
            .lock()
            .await
            .venues
            .insert(venue.id, venue.clone());
        venue
    }

    pub async fn set_venue_status(&self, venue_id: Uuid, status: VenueStatus) {
        if let Some(venue) = self.inner.lock().await.venues.get_mut(&venue_id) {
            venue.status = status;
        }
    }

    pub async fn add_user(&self, id: Uuid, username: &str, email: &str) {
        self.inner.lock().await.users.insert(
            id,
            UserRecord {
                username: username.to_string(),
                email: email.to_string(),
            },
        );
    }

    /// Inserts a reservation as-is, bypassing every check. Used to seed
    /// inconsistent data.
    pub async fn insert_raw(&self, reservation: Reservation) {
        self.inner.lock().await.reservations.push(reservation);
    }
}

#[async_trait]
impl ReservationStore for InMemoryStore {
    async fn get_venue(&self, venue_id: Uuid) -> BookingResult<Option<Venue>> {
        Ok(self.inner.lock().await.venues.get(&venue_id).cloned())
    }

    async fn list_venues_for_owner(
        &self,
        owner_id: Uuid,
        status: Option<VenueStatus>,
    ) -> BookingResult<Vec<Venue>> {
        let inner = self.inner.lock().await;
        let mut venues: Vec<Venue> = inner
            .venues
            .values()
            .filter(|venue| venue.owner_id == owner_id)
            .filter(|venue| status.is_none_or(|s| venue.status == s))
            .cloned()
            .collect();
        venues.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(venues)
    }

    async fn get_reservation(&self, reservation_id: Uuid) -> BookingResult<Option<Reservation>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .reservations
            .iter()
            .find(|r| r.id == reservation_id)
            .cloned())
    }

    async fn create_reservation(
        &self,
        venue_id: Uuid,
        requester_id: Uuid,
        event_date: NaiveDate,
    ) -> BookingResult<Reservation> {
        let mut inner = self.inner.lock().await;

        let venue = inner
            .venues
            .get(&venue_id)
            .ok_or_else(|| BookingError::NotFound(format!("Venue with ID {} not found", venue_id)))?;
        if venue.status != VenueStatus::Open {
            return Err(BookingError::VenueClosed(venue_id));
        }
        if inner
            .unavailable
            .get(&venue_id)
            .is_some_and(|dates| dates.contains(&event_date))
        {
            return Err(BookingError::DateUnavailable {
                venue_id,
                date: event_date,
            });
        }
        if inner.holders(venue_id, event_date).next().is_some() {
            return Err(BookingError::SlotTaken {
                venue_id,
                date: event_date,
            });
        }

        let reservation = Reservation {
            id: Uuid::new_v4(),
            venue_id,
            requester_id,
            event_date,
            status: ReservationStatus::Pending,
            created_at: Utc::now(),
        };
        inner.reservations.push(reservation.clone());
        Ok(reservation)
    }

    async fn update_status(
        &self,
        reservation_id: Uuid,
        expected: ReservationStatus,
        to: ReservationStatus,
    ) -> BookingResult<bool> {
        let mut inner = self.inner.lock().await;

        let Some(current) = inner.reservations.iter().find(|r| r.id == reservation_id) else {
            return Ok(false);
        };
        if current.status != expected {
            return Ok(false);
        }
        let (venue_id, event_date) = (current.venue_id, current.event_date);

        if to.is_holding()
            && inner
                .holders(venue_id, event_date)
                .any(|r| r.id != reservation_id)
        {
            return Err(BookingError::SlotTaken {
                venue_id,
                date: event_date,
            });
        }

        if let Some(reservation) = inner
            .reservations
            .iter_mut()
            .find(|r| r.id == reservation_id)
        {
            reservation.status = to;
        }
        Ok(true)
    }

    async fn holding_count(&self, venue_id: Uuid, event_date: NaiveDate) -> BookingResult<i64> {
        let inner = self.inner.lock().await;
        Ok(inner.holders(venue_id, event_date).count() as i64)
    }

    async fn replace_unavailable_dates(
        &self,
        venue_id: Uuid,
        dates: Vec<NaiveDate>,
    ) -> BookingResult<()> {
        let mut inner = self.inner.lock().await;
        inner
            .unavailable
            .insert(venue_id, dates.into_iter().collect());
        Ok(())
    }

    async fn unavailable_dates(&self, venue_id: Uuid) -> BookingResult<Vec<NaiveDate>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .unavailable
            .get(&venue_id)
            .map(|dates| dates.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn is_date_blocked(&self, venue_id: Uuid, date: NaiveDate) -> BookingResult<bool> {
        let inner = self.inner.lock().await;
        Ok(inner
            .unavailable
            .get(&venue_id)
            .is_some_and(|dates| dates.contains(&date)))
    }

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        statuses: Vec<ReservationStatus>,
    ) -> BookingResult<Vec<Reservation>> {
        let inner = self.inner.lock().await;
        let venue_ids = inner.owned_venue_ids(owner_id);
        Ok(Inner::newest_first(inner.reservations.iter().filter(|r| {
            venue_ids.contains(&r.venue_id) && (statuses.is_empty() || statuses.contains(&r.status))
        })))
    }

    async fn list_for_requester(&self, requester_id: Uuid) -> BookingResult<Vec<Reservation>> {
        let inner = self.inner.lock().await;
        Ok(Inner::newest_first(
            inner
                .reservations
                .iter()
                .filter(|r| r.requester_id == requester_id),
        ))
    }

    async fn count_by_status(
        &self,
        owner_id: Uuid,
        statuses: Vec<ReservationStatus>,
    ) -> BookingResult<i64> {
        Ok(self.inner.lock().await.count(owner_id, &statuses))
    }

    async fn recent_for_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
    ) -> BookingResult<Vec<ReservationSummary>> {
        Ok(self.inner.lock().await.recent(owner_id, limit))
    }

    async fn dashboard_summary(
        &self,
        owner_id: Uuid,
        recent_limit: i64,
    ) -> BookingResult<DashboardSummary> {
        let inner = self.inner.lock().await;
        Ok(DashboardSummary {
            owner_id,
            total_bookings: inner.count(owner_id, &DashboardCounter::Total.statuses()),
            pending: inner.count(owner_id, &DashboardCounter::Pending.statuses()),
            cancelled: inner.count(owner_id, &DashboardCounter::Cancelled.statuses()),
            recent: inner.recent(owner_id, recent_limit),
        })
    }
}

mock! {
    pub Store {}

    #[async_trait]
    impl ReservationStore for Store {
        async fn get_venue(&self, venue_id: Uuid) -> BookingResult<Option<Venue>>;

        async fn list_venues_for_owner(
            &self,
            owner_id: Uuid,
            status: Option<VenueStatus>,
        ) -> BookingResult<Vec<Venue>>;

        async fn get_reservation(&self, reservation_id: Uuid) -> BookingResult<Option<Reservation>>;

        async fn create_reservation(
            &self,
            venue_id: Uuid,
            requester_id: Uuid,
            event_date: NaiveDate,
        ) -> BookingResult<Reservation>;

        async fn update_status(
            &self,
            reservation_id: Uuid,
            expected: ReservationStatus,
            to: ReservationStatus,
        ) -> BookingResult<bool>;

        async fn holding_count(&self, venue_id: Uuid, event_date: NaiveDate) -> BookingResult<i64>;

        async fn replace_unavailable_dates(
            &self,
            venue_id: Uuid,
            dates: Vec<NaiveDate>,
        ) -> BookingResult<()>;

        async fn unavailable_dates(&self, venue_id: Uuid) -> BookingResult<Vec<NaiveDate>>;

        async fn is_date_blocked(&self, venue_id: Uuid, date: NaiveDate) -> BookingResult<bool>;

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

        async fn dashboard_summary(
            &self,
            owner_id: Uuid,
            recent_limit: i64,
        ) -> BookingResult<DashboardSummary>;
    }
}
