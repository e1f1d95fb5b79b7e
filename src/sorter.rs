use crate::dashboard::EMPTY_PLACEHOLDER;
use crate::types::Lead;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::cmp::Reverse;
use std::fmt::Display;

/// Date-time layouts carrying their own UTC offset
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M %z",
];

/// Date-time layouts seen in lead exports, interpreted in the display zone
///
/// Two-digit-year layouts come first: `%Y` would read `24` as year 24.
const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%y %I:%M %p",
    "%m/%d/%y, %I:%M:%S %p",
    "%m/%d/%y, %I:%M %p",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y, %I:%M:%S %p",
    "%m/%d/%Y, %I:%M %p",
    "%B %d, %Y %I:%M %p",
    "%b %d, %Y %I:%M %p",
    "%b %d %Y %I:%M %p",
    "%b %d %Y %H:%M:%S",
];

/// Date-only layouts, taken as local midnight
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
];

/// Display layout for timestamps (e.g. `01/05/2024, 02:05 PM`)
const DISPLAY_FORMAT: &str = "%m/%d/%Y, %I:%M %p";

/// Parse a timestamp in the local zone
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    parse_timestamp_in(raw, &Local)
}

/// Parse a timestamp, resolving zone-less values in `tz`
///
/// Accepts RFC 3339 and RFC 2822 (with their own offsets), ISO-like and US
/// date-times, and date-only values. ISO date-only values (`2024-01-05`) mean
/// UTC midnight; other date-only layouts mean midnight in `tz`.
pub fn parse_timestamp_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(tz));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(tz));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.with_timezone(tz));
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return tz.from_local_datetime(&naive).earliest();
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight).with_timezone(tz));
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            let midnight = date.and_hms_opt(0, 0, 0)?;
            return tz.from_local_datetime(&midnight).earliest();
        }
    }

    parse_with_zone_suffix(raw, tz)
}

/// Handle ISO-like date-times followed by a zone name, e.g. `2024-01-05 10:00:00 UTC`
fn parse_with_zone_suffix<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let re = regex::Regex::new(
        r"^(\d{4}-\d{1,2}-\d{1,2})[T ](\d{1,2}:\d{2}(?::\d{2})?(?:\.\d+)?)\s*([A-Za-z]+)$",
    )
    .ok()?;
    let caps = re.captures(raw)?;

    let stamp = format!("{} {}", &caps[1], &caps[2]);
    let naive = NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%d %H:%M"))
        .ok()?;

    match caps[3].to_ascii_uppercase().as_str() {
        "UTC" | "GMT" | "Z" => Some(Utc.from_utc_datetime(&naive).with_timezone(tz)),
        _ => tz.from_local_datetime(&naive).earliest(),
    }
}

/// Milliseconds since the epoch, `None` when missing or unparseable
fn received_millis<Tz: TimeZone>(lead: &Lead, tz: &Tz) -> Option<i64> {
    parse_timestamp_in(lead.received_on(), tz).map(|dt| dt.timestamp_millis())
}

/// Sort leads by received timestamp, newest first
///
/// Leads with a missing or unparseable timestamp go last. The sort is stable,
/// so ties keep their merge order.
pub fn sort_by_received_desc(leads: &mut [Lead]) {
    sort_by_received_desc_in(leads, &Local)
}

pub fn sort_by_received_desc_in<Tz: TimeZone>(leads: &mut [Lead], tz: &Tz) {
    // Reverse(None) orders after every Reverse(Some(_))
    leads.sort_by_cached_key(|lead| Reverse(received_millis(lead, tz)));
}

/// Human-readable local date-time, the literal value if unparseable, or a placeholder if blank
pub fn format_timestamp(raw: &str) -> String {
    format_timestamp_in(raw, &Local)
}

pub fn format_timestamp_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return EMPTY_PLACEHOLDER.to_string();
    }

    match parse_timestamp_in(trimmed, tz) {
        Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        None => trimmed.to_string(),
    }
}
