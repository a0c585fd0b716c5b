pub mod reporting;
pub mod reservation;
pub mod unavailable_date;
pub mod venue;
