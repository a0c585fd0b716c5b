//! # Booking Engine
//!
//! The sole authority for creating and transitioning reservations, editing
//! blackout dates and answering the owner dashboard queries.
//!
//! The engine holds no mutable state of its own. Every call takes the acting
//! [`Actor`] explicitly and delegates atomicity to the [`ReservationStore`].
//! It never retries: `Conflict` and `StorageUnavailable` are handed back to
//! the caller, who must re-read state before trying again.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::broadcast;
use tracing::{debug, error, field::display, info, warn};
use uuid::Uuid;

use crate::calendar;
use crate::errors::{BookingError, BookingResult};
use crate::events::ReservationEvent;
use crate::guards;
use crate::lifecycle;
use crate::models::dashboard::DashboardSummary;
use crate::models::reservation::{
    Reservation, ReservationAction, ReservationStatus, ReservationSummary,
};
use crate::models::user::Actor;
use crate::models::venue::{Venue, VenueStatus};
use crate::store::ReservationStore;

const EVENT_CAPACITY: usize = 256;

/// Upper bound for recent-activity lists.
pub const MAX_RECENT_LIMIT: i64 = 100;

/// Identifiers attached to the log line of a failed store call.
#[derive(Debug, Default, Clone, Copy)]
struct StoreCall {
    operation: &'static str,
    actor_id: Option<Uuid>,
    owner_id: Option<Uuid>,
    venue_id: Option<Uuid>,
    reservation_id: Option<Uuid>,
}

impl StoreCall {
    fn new(operation: &'static str, actor: Option<&Actor>) -> Self {
        Self {
            operation,
            actor_id: actor.map(|actor| actor.id),
            ..Self::default()
        }
    }

    fn owner(mut self, owner_id: Uuid) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    fn venue(mut self, venue_id: Uuid) -> Self {
        self.venue_id = Some(venue_id);
        self
    }

    fn reservation(mut self, reservation_id: Uuid) -> Self {
        self.reservation_id = Some(reservation_id);
        self
    }

    fn failed(self) -> impl Fn(&BookingError) {
        move |err| {
            warn!(
                operation = %self.operation,
                actor_id = self.actor_id.map(display),
                owner_id = self.owner_id.map(display),
                venue_id = self.venue_id.map(display),
                reservation_id = self.reservation_id.map(display),
                error = %err,
                retryable = err.is_retryable(),
                "store call failed"
            )
        }
    }
}

#[derive(Clone)]
pub struct BookingEngine {
    store: Arc<dyn ReservationStore>,
    events: broadcast::Sender<ReservationEvent>,
}

impl BookingEngine {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { store, events }
    }

    /// Receives every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ReservationEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: ReservationEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    async fn load_venue(&self, actor: Option<&Actor>, venue_id: Uuid) -> BookingResult<Venue> {
        self.store
            .get_venue(venue_id)
            .await
            .inspect_err(StoreCall::new("get_venue", actor).venue(venue_id).failed())?
            .ok_or_else(|| BookingError::NotFound(format!("Venue with ID {} not found", venue_id)))
    }

    async fn load_reservation(
        &self,
        actor: &Actor,
        reservation_id: Uuid,
    ) -> BookingResult<Reservation> {
        self.store
            .get_reservation(reservation_id)
            .await
            .inspect_err(
                StoreCall::new("get_reservation", Some(actor))
                    .reservation(reservation_id)
                    .failed(),
            )?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Reservation with ID {} not found", reservation_id))
            })
    }

    /// Loads a reservation together with its venue. A reservation whose venue
    /// is gone is a data-integrity condition and is logged as such.
    async fn load_with_venue(
        &self,
        actor: &Actor,
        reservation_id: Uuid,
    ) -> BookingResult<(Reservation, Venue)> {
        let reservation = self.load_reservation(actor, reservation_id).await?;
        let venue = match self
            .store
            .get_venue(reservation.venue_id)
            .await
            .inspect_err(
                StoreCall::new("get_venue", Some(actor))
                    .venue(reservation.venue_id)
                    .reservation(reservation_id)
                    .failed(),
            )? {
            Some(venue) => venue,
            None => {
                error!(
                    reservation_id = %reservation.id,
                    venue_id = %reservation.venue_id,
                    "reservation references a missing venue"
                );
                return Err(BookingError::NotFound(format!(
                    "Venue with ID {} not found",
                    reservation.venue_id
                )));
            }
        };
        Ok((reservation, venue))
    }

    /// Requests `event_date` at `venue_id` on behalf of `actor`. The new
    /// reservation always starts `pending`.
    pub async fn create_reservation(
        &self,
        actor: &Actor,
        venue_id: Uuid,
        event_date: NaiveDate,
    ) -> BookingResult<Reservation> {
        let venue = self.load_venue(Some(actor), venue_id).await?;
        if venue.status != VenueStatus::Open {
            warn!(actor_id = %actor.id, venue_id = %venue_id, "reservation requested on closed venue");
            return Err(BookingError::VenueClosed(venue_id));
        }

        let reservation = match self
            .store
            .create_reservation(venue_id, actor.id, event_date)
            .await
        {
            Ok(reservation) => reservation,
            Err(err) => {
                warn!(
                    actor_id = %actor.id,
                    venue_id = %venue_id,
                    %event_date,
                    error = %err,
                    "reservation request refused"
                );
                return Err(err);
            }
        };

        info!(
            reservation_id = %reservation.id,
            venue_id = %venue_id,
            requester_id = %actor.id,
            %event_date,
            "reservation created"
        );
        self.publish(ReservationEvent::Created {
            reservation_id: reservation.id,
            venue_id,
            requester_id: actor.id,
            event_date,
        });
        Ok(reservation)
    }

    /// Applies `action` to a reservation and returns the new status.
    pub async fn transition(
        &self,
        actor: &Actor,
        reservation_id: Uuid,
        action: ReservationAction,
    ) -> BookingResult<ReservationStatus> {
        let (reservation, venue) = self.load_with_venue(actor, reservation_id).await?;
        guards::ensure_can_act(actor, action, &reservation, &venue)?;

        let from = reservation.status;
        let to = lifecycle::apply(from, action).inspect_err(|_| {
            warn!(
                reservation_id = %reservation_id,
                actor_id = %actor.id,
                %from,
                %action,
                "invalid transition"
            );
        })?;

        if from.is_holding() {
            let holders = self
                .store
                .holding_count(reservation.venue_id, reservation.event_date)
                .await
                .inspect_err(
                    StoreCall::new("holding_count", Some(actor))
                        .venue(reservation.venue_id)
                        .reservation(reservation_id)
                        .failed(),
                )?;
            if holders > 1 {
                error!(
                    reservation_id = %reservation_id,
                    venue_id = %reservation.venue_id,
                    event_date = %reservation.event_date,
                    holders,
                    "slot is held by more than one reservation"
                );
            }
        }

        let applied = self
            .store
            .update_status(reservation_id, from, to)
            .await
            .inspect_err(|err| {
                warn!(
                    reservation_id = %reservation_id,
                    venue_id = %venue.id,
                    actor_id = %actor.id,
                    %from,
                    %to,
                    error = %err,
                    "status update failed"
                );
            })?;
        if !applied {
            warn!(
                reservation_id = %reservation_id,
                actor_id = %actor.id,
                %from,
                %action,
                "transition lost a concurrent update"
            );
            return Err(BookingError::Conflict(format!(
                "Reservation {} is no longer {}",
                reservation_id, from
            )));
        }

        info!(
            reservation_id = %reservation_id,
            venue_id = %venue.id,
            actor_id = %actor.id,
            %from,
            %to,
            "reservation transitioned"
        );
        self.publish(ReservationEvent::Transitioned {
            reservation_id,
            venue_id: venue.id,
            actor_id: actor.id,
            action,
            from,
            to,
        });
        Ok(to)
    }

    pub async fn get_reservation(
        &self,
        actor: &Actor,
        reservation_id: Uuid,
    ) -> BookingResult<Reservation> {
        let (reservation, venue) = self.load_with_venue(actor, reservation_id).await?;
        guards::ensure_can_view(actor, &reservation, &venue)?;
        Ok(reservation)
    }

    /// Reservations across the owner's venues, newest first.
    pub async fn list_for_owner(
        &self,
        actor: &Actor,
        owner_id: Uuid,
        statuses: Vec<ReservationStatus>,
    ) -> BookingResult<Vec<Reservation>> {
        guards::ensure_owner_scope(actor, owner_id)?;
        debug!(owner_id = %owner_id, ?statuses, "listing reservations for owner");
        self.store
            .list_for_owner(owner_id, statuses)
            .await
            .inspect_err(StoreCall::new("list_for_owner", Some(actor)).owner(owner_id).failed())
    }

    pub async fn list_for_requester(
        &self,
        actor: &Actor,
        requester_id: Uuid,
    ) -> BookingResult<Vec<Reservation>> {
        if actor.id != requester_id && !actor.is_admin() {
            return Err(BookingError::Unauthorized(format!(
                "User {} cannot view reservations of user {}",
                actor.id, requester_id
            )));
        }
        self.store
            .list_for_requester(requester_id)
            .await
            .inspect_err(StoreCall::new("list_for_requester", Some(actor)).failed())
    }

    /// Replaces the venue's blackout dates with `dates`. Every malformed entry
    /// is reported; nothing is written unless all of them are valid.
    pub async fn set_unavailable_dates(
        &self,
        actor: &Actor,
        venue_id: Uuid,
        dates: &[String],
    ) -> BookingResult<Vec<NaiveDate>> {
        let venue = self.load_venue(Some(actor), venue_id).await?;
        guards::ensure_venue_owner(actor, &venue)?;
        let dates = calendar::validate_dates(dates)?;

        self.store
            .replace_unavailable_dates(venue_id, dates.clone())
            .await
            .inspect_err(
                StoreCall::new("replace_unavailable_dates", Some(actor))
                    .venue(venue_id)
                    .failed(),
            )?;

        info!(venue_id = %venue_id, count = dates.len(), "unavailable dates replaced");
        self.publish(ReservationEvent::UnavailableDatesReplaced {
            venue_id,
            dates: dates.clone(),
        });
        Ok(dates)
    }

    pub async fn unavailable_dates(&self, venue_id: Uuid) -> BookingResult<Vec<NaiveDate>> {
        self.load_venue(None, venue_id).await?;
        self.store
            .unavailable_dates(venue_id)
            .await
            .inspect_err(StoreCall::new("unavailable_dates", None).venue(venue_id).failed())
    }

    pub async fn is_date_blocked(&self, venue_id: Uuid, date: NaiveDate) -> BookingResult<bool> {
        self.store
            .is_date_blocked(venue_id, date)
            .await
            .inspect_err(StoreCall::new("is_date_blocked", None).venue(venue_id).failed())
    }

    /// Number of reservations on the owner's venues whose status is in `statuses`.
    pub async fn count_by_status(
        &self,
        actor: &Actor,
        owner_id: Uuid,
        statuses: Vec<ReservationStatus>,
    ) -> BookingResult<i64> {
        guards::ensure_owner_scope(actor, owner_id)?;
        if statuses.is_empty() {
            return Ok(0);
        }
        self.store
            .count_by_status(owner_id, statuses)
            .await
            .inspect_err(StoreCall::new("count_by_status", Some(actor)).owner(owner_id).failed())
    }

    pub async fn recent_for_owner(
        &self,
        actor: &Actor,
        owner_id: Uuid,
        limit: i64,
    ) -> BookingResult<Vec<ReservationSummary>> {
        guards::ensure_owner_scope(actor, owner_id)?;
        let limit = capped_recent_limit(limit)?;
        self.store
            .recent_for_owner(owner_id, limit)
            .await
            .inspect_err(StoreCall::new("recent_for_owner", Some(actor)).owner(owner_id).failed())
    }

    /// Counters and recent activity for the owner dashboard, read as one
    /// snapshot so the counters never contradict each other.
    pub async fn dashboard_summary(
        &self,
        actor: &Actor,
        owner_id: Uuid,
        recent_limit: i64,
    ) -> BookingResult<DashboardSummary> {
        guards::ensure_owner_scope(actor, owner_id)?;
        let limit = capped_recent_limit(recent_limit)?;
        self.store
            .dashboard_summary(owner_id, limit)
            .await
            .inspect_err(StoreCall::new("dashboard_summary", Some(actor)).owner(owner_id).failed())
    }

    pub async fn list_venues_for_owner(
        &self,
        actor: &Actor,
        owner_id: Uuid,
        status: Option<VenueStatus>,
    ) -> BookingResult<Vec<Venue>> {
        guards::ensure_owner_scope(actor, owner_id)?;
        self.store
            .list_venues_for_owner(owner_id, status)
            .await
            .inspect_err(
                StoreCall::new("list_venues_for_owner", Some(actor))
                    .owner(owner_id)
                    .failed(),
            )
    }
}

/// Validates a recent-activity limit and caps it at [`MAX_RECENT_LIMIT`].
fn capped_recent_limit(limit: i64) -> BookingResult<i64> {
    if limit < 1 {
        return Err(BookingError::Validation(
            "limit must be at least 1".to_string(),
        ));
    }
    Ok(limit.min(MAX_RECENT_LIMIT))
}
