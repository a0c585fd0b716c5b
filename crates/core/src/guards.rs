//! Authorization checks shared by the engine operations.

use tracing::warn;
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::lifecycle::Party;
use crate::models::reservation::{Reservation, ReservationAction};
use crate::models::user::Actor;
use crate::models::venue::Venue;

/// The actor must own the venue.
pub fn ensure_venue_owner(actor: &Actor, venue: &Venue) -> BookingResult<()> {
    if actor.id == venue.owner_id {
        return Ok(());
    }
    warn!(actor_id = %actor.id, venue_id = %venue.id, "actor does not own venue");
    Err(BookingError::Unauthorized(format!(
        "User {} does not own venue {}",
        actor.id, venue.id
    )))
}

/// Owner-scoped reads are open to that owner and to admins.
pub fn ensure_owner_scope(actor: &Actor, owner_id: Uuid) -> BookingResult<()> {
    if actor.id == owner_id || actor.is_admin() {
        return Ok(());
    }
    warn!(actor_id = %actor.id, owner_id = %owner_id, "actor cannot view another owner's data");
    Err(BookingError::Unauthorized(format!(
        "User {} cannot view reservations of owner {}",
        actor.id, owner_id
    )))
}

/// A reservation is visible to its requester, the venue owner and admins.
pub fn ensure_can_view(actor: &Actor, reservation: &Reservation, venue: &Venue) -> BookingResult<()> {
    if actor.is_admin() || actor.id == reservation.requester_id || actor.id == venue.owner_id {
        return Ok(());
    }
    Err(BookingError::Unauthorized(format!(
        "User {} cannot view reservation {}",
        actor.id, reservation.id
    )))
}

/// The actor must be the party the action belongs to, or an admin.
pub fn ensure_can_act(
    actor: &Actor,
    action: ReservationAction,
    reservation: &Reservation,
    venue: &Venue,
) -> BookingResult<()> {
    if actor.is_admin() {
        return Ok(());
    }
    let allowed = match action.party() {
        Party::Owner => actor.id == venue.owner_id,
        Party::Requester => actor.id == reservation.requester_id,
    };
    if allowed {
        return Ok(());
    }
    warn!(
        actor_id = %actor.id,
        reservation_id = %reservation.id,
        venue_id = %venue.id,
        %action,
        "transition rejected: actor is not the acting party"
    );
    Err(BookingError::Unauthorized(format!(
        "User {} may not {} reservation {}",
        actor.id, action, reservation.id
    )))
}
