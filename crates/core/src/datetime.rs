//! Date helpers shared by the value model and the key model.
//!
//! Dates always travel as ISO-8601 UTC strings with millisecond precision,
//! e.g. `1977-12-19T11:30:45.912Z`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Renders a date in its canonical form.
pub fn to_iso_millis(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an RFC 3339 string into a UTC date.
///
/// Returns `None` for anything that is not a complete RFC 3339 timestamp.
pub fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// Serde adapter for `DateTime<Utc>` fields using the canonical form.
///
/// Deserialization rejects strings that are not RFC 3339 timestamps.
pub mod iso_millis {
    use super::*;

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_iso_millis(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_iso(&s).ok_or_else(|| serde::de::Error::custom(format!("not a date: {s}")))
    }
}
