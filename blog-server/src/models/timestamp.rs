//! Lenient timestamp parsing for caller-supplied datetimes
//!
//! Browsers and form libraries frequently send zone-less local datetimes
//! (`2024-05-01T10:00:00` or `2024-05-01T10:00`). Those are read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse an RFC 3339 datetime, falling back to a zone-less ISO-8601 one.
pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let s = s.trim();
    match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(rfc_err) => NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| naive.and_utc())
            .ok_or(rfc_err),
    }
}

/// Serde helper for `Option<DateTime<Utc>>` fields using [`parse`].
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| {
            parse(&raw).map_err(|e| serde::de::Error::custom(format!("invalid datetime '{}': {}", raw, e)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse("2024-05-01T12:00:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn parses_zoneless_as_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(parse("2024-05-01T10:00:00").unwrap(), expected);
        assert_eq!(parse("2024-05-01T10:00").unwrap(), expected);
    }

    #[test]
    fn keeps_fractional_seconds() {
        let dt = parse("2024-05-01T10:00:00.250").unwrap();
        assert_eq!(dt.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("yesterday").is_err());
        assert!(parse("2024-13-01T10:00:00").is_err());
    }
}
