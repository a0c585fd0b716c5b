//! Reservation state machine.
//!
//! The table below is the single source of truth for which action moves a
//! reservation from which status to which. Anything not listed is an invalid
//! transition.

use crate::errors::{BookingError, BookingResult};
use crate::models::reservation::{ReservationAction, ReservationStatus};

use ReservationAction as A;
use ReservationStatus as S;

/// Which side of a reservation may perform an action (admins may perform any).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Owner,
    Requester,
}

/// `(from, action, to)` rows of the state machine.
pub const TRANSITIONS: &[(ReservationStatus, ReservationAction, ReservationStatus)] = &[
    (S::Pending, A::Accept, S::Accepted),
    (S::Pending, A::Reject, S::Rejected),
    (S::Accepted, A::Confirm, S::Confirmed),
    (S::Accepted, A::Cancel, S::Cancelled),
    (S::Confirmed, A::Complete, S::Completed),
    (S::Confirmed, A::RequestCancellation, S::CancellationRequested),
    (S::CancellationRequested, A::ApproveCancellation, S::Cancelled),
    (S::CancellationRequested, A::DenyCancellation, S::Confirmed),
];

impl ReservationAction {
    pub fn party(&self) -> Party {
        match self {
            A::RequestCancellation => Party::Requester,
            _ => Party::Owner,
        }
    }
}

/// Status reached by applying `action` from `from`, if the move is legal.
pub fn next_status(from: ReservationStatus, action: ReservationAction) -> Option<ReservationStatus> {
    TRANSITIONS
        .iter()
        .find(|(source, a, _)| *source == from && *a == action)
        .map(|(_, _, to)| *to)
}

pub fn apply(from: ReservationStatus, action: ReservationAction) -> BookingResult<ReservationStatus> {
    next_status(from, action).ok_or(BookingError::InvalidTransition { from, action })
}

/// Actions that are legal from `status`.
pub fn available_actions(status: ReservationStatus) -> Vec<ReservationAction> {
    TRANSITIONS
        .iter()
        .filter(|(source, _, _)| *source == status)
        .map(|(_, action, _)| *action)
        .collect()
}
