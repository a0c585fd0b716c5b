use chrono::NaiveDate;

use crate::errors::{BookingError, BookingResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a single `YYYY-MM-DD` date. Non-padded or out-of-range components
/// are rejected.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Parses a requested event date.
pub fn parse_event_date(raw: &str) -> BookingResult<NaiveDate> {
    parse_calendar_date(raw.trim()).ok_or_else(|| BookingError::InvalidDate(vec![raw.to_string()]))
}

/// Validates every submitted blackout date, reporting all bad entries at once.
/// The result is sorted and free of duplicates.
pub fn validate_dates(raw: &[String]) -> BookingResult<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(raw.len());
    let mut invalid = Vec::new();

    for entry in raw {
        match parse_calendar_date(entry.trim()) {
            Some(date) => dates.push(date),
            None => invalid.push(entry.clone()),
        }
    }

    if !invalid.is_empty() {
        return Err(BookingError::InvalidDate(invalid));
    }

    dates.sort();
    dates.dedup();
    Ok(dates)
}
