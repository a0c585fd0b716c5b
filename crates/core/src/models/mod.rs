pub mod dashboard;
pub mod reservation;
pub mod user;
pub mod venue;
