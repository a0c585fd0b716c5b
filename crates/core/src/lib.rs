//! # VenueBook Core
//!
//! Domain types and the reservation lifecycle engine for the venue-rental
//! marketplace. Persistence is reached only through [`store::ReservationStore`],
//! so the engine can run against PostgreSQL or the in-memory store in [`mock`].

pub mod calendar;
pub mod engine;
pub mod errors;
pub mod events;
pub mod guards;
pub mod lifecycle;
pub mod models;
pub mod store;

pub mod mock;
