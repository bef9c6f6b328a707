//! Due date parsing.
//!
//! Clients send either an RFC 3339 timestamp or a zone-less date-time as
//! produced by HTML `datetime-local` inputs. Zone-less values are read in
//! the server's local time zone.

use super::TaskDomainError;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

const LOCAL_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a due date, reading zone-less values in the local time zone.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidDueDate`] when `raw` matches no
/// supported format.
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, TaskDomainError> {
    parse_due_date_in(raw, &Local)
}

/// Parses a due date, reading zone-less values in `zone`.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidDueDate`] when `raw` matches no
/// supported format or names a local time that does not exist in `zone`.
pub fn parse_due_date_in<Tz: TimeZone>(
    raw: &str,
    zone: &Tz,
) -> Result<DateTime<Utc>, TaskDomainError> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .and_then(|naive| zone.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| TaskDomainError::InvalidDueDate(raw.to_owned()))
}
