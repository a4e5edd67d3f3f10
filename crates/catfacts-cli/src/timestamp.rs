//! Human-readable creation times.
//!
//! Services send `created_at` in whatever shape their database produces.
//! RFC 3339 values keep their offset; naive date-times are taken as UTC.
//! Anything unrecognised is shown verbatim.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parsed {
  Instant(DateTime<Utc>),
  Date(NaiveDate),
}

fn parse(raw: &str) -> Option<Parsed> {
  let raw = raw.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(Parsed::Instant(dt.with_timezone(&Utc)));
  }
  for format in NAIVE_FORMATS {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
      return Some(Parsed::Instant(naive.and_utc()));
    }
  }
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .map(Parsed::Date)
}

/// `Jan 02, 2025 14:30` in `tz`, or the raw string.
pub fn format_in<Tz>(raw: &str, tz: &Tz) -> String
where
  Tz: TimeZone,
  Tz::Offset: std::fmt::Display,
{
  match parse(raw) {
    Some(Parsed::Instant(utc)) => utc.with_timezone(tz).format("%b %d, %Y %H:%M").to_string(),
    Some(Parsed::Date(date)) => date.format("%b %d, %Y").to_string(),
    None => raw.to_owned(),
  }
}

/// [`format_in`] the local time zone.
pub fn display(raw: &str) -> String { format_in(raw, &Local) }
