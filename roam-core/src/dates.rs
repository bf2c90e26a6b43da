//! Lenient date handling for trip payloads.
//!
//! Clients send either a bare `YYYY-MM-DD` or a full ISO-8601 timestamp
//! (`2024-06-01T10:00:00`, `2024-06-01T10:00:00.000Z`, `2024-06-01T10:00:00+02:00`).
//! Only the calendar date is kept.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

pub fn parse_lenient(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    let naive = raw.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M"))
        .map(|ts| ts.date())
        .ok()
}

/// `deserialize_with` adapter for `Option<NaiveDate>` fields. Null and empty
/// strings read as `None`; anything else must parse.
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_lenient(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepted_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(parse_lenient("2024-06-01"), Some(expected));
        assert_eq!(parse_lenient("2024-06-01T10:30:00"), Some(expected));
        assert_eq!(parse_lenient("2024-06-01T10:30:00.000Z"), Some(expected));
        assert_eq!(parse_lenient("2024-06-01T10:30:00+02:00"), Some(expected));
        assert_eq!(parse_lenient("2024-06-01T10:30"), Some(expected));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_lenient("June 1st"), None);
        assert_eq!(parse_lenient(""), None);
        assert_eq!(parse_lenient("2024-13-01"), None);
    }
}
