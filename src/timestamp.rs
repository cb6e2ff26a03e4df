//! ISO-8601 timestamp codec for stored attributes.
//!
//! Timestamps are written in the extended UTC form `YYYY-MM-DDTHH:mm:ss[.fff]Z`
//! where the fraction carries as many digit groups (3, 6 or 9) as needed to
//! represent the value exactly. A missing timestamp is written as an explicit
//! `NULL` attribute rather than being left out of the item.
//!
//! The encoded strings double as the `createdAt` sort key, which the store
//! compares lexicographically. Two values that differ only in fraction
//! length (`...:00Z` vs `...:00.5Z`) do not sort chronologically.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::store::{AttributeValue, StoreError};

/// Format a timestamp as an ISO-8601 string.
pub fn format(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse an ISO-8601 string. Offsets other than `Z` are normalized to UTC.
pub fn parse(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|ts| ts.with_timezone(&Utc))
}

/// Encode an optional timestamp into an attribute value.
pub fn encode(timestamp: Option<&DateTime<Utc>>) -> AttributeValue {
    match timestamp {
        Some(ts) => AttributeValue::S(format(ts)),
        None => AttributeValue::Null,
    }
}

/// Decode an attribute value written by [`encode`].
pub fn decode(value: &AttributeValue) -> Result<Option<DateTime<Utc>>, StoreError> {
    match value {
        AttributeValue::Null => Ok(None),
        AttributeValue::S(raw) => parse(raw)
            .map(Some)
            .map_err(|e| StoreError::Mapping(format!("invalid timestamp {:?}: {}", raw, e))),
        AttributeValue::N(raw) => Err(StoreError::Mapping(format!(
            "expected timestamp string, found number {}",
            raw
        ))),
    }
}

/// Serde adapter for `Option<DateTime<Utc>>` fields using the same string form.
pub mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&super::format(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| super::parse(&s).map_err(D::Error::custom))
            .transpose()
    }
}
