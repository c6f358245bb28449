//! Calendar-day handling.
//!
//! Sailing dates arrive as loosely formatted strings. Everything downstream
//! works on [`NaiveDate`] so no host time zone ever shifts a day boundary.

use crate::error::{ItineraryError, Result};
use chrono::{Days, NaiveDate};

const ISO_DAY: &str = "%Y-%m-%d";
const US_DAY: &str = "%m/%d/%Y";

/// Parse a date or date-time string down to its calendar day.
///
/// Accepts `YYYY-MM-DD`, ISO date-times (`YYYY-MM-DDTHH:MM:SS`, with or
/// without fraction and offset), `YYYY-MM-DD HH:MM:SS` and `MM/DD/YYYY`.
/// Date-times keep the day as written; the offset is not applied.
pub fn parse_day(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ItineraryError::invalid_date(raw));
    }

    if let Ok(day) = NaiveDate::parse_from_str(trimmed, ISO_DAY) {
        return Ok(day);
    }

    // Date-time: the first ten bytes are the day, followed by 'T' or ' '
    if let (Some(head), Some(sep)) = (trimmed.get(..10), trimmed.get(10..11)) {
        if sep == "T" || sep == "t" || sep == " " {
            if let Ok(day) = NaiveDate::parse_from_str(head, ISO_DAY) {
                return Ok(day);
            }
        }
    }

    NaiveDate::parse_from_str(trimmed, US_DAY).map_err(|_| ItineraryError::invalid_date(raw))
}

/// Parse an optional date, treating blanks and garbage as absent.
pub fn parse_optional_day(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    match parse_day(raw) {
        Ok(day) => Some(day),
        Err(err) => {
            log::debug!("Ignoring unusable date: {err}");
            None
        }
    }
}

/// Advance a day by a number of nights.
pub fn add_nights(day: NaiveDate, nights: u32) -> Result<NaiveDate> {
    day.checked_add_days(Days::new(u64::from(nights)))
        .ok_or_else(|| ItineraryError::DateOverflow {
            date: day.to_string(),
            nights,
        })
}
