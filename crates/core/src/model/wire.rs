//! Field deserializers for backend payloads that may carry `null` or loosely
//! formatted values.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Reads `null` as the type's default. Pair with `#[serde(default)]` so a
/// missing field behaves the same.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
}

/// Accepts RFC 3339, zone-less ISO timestamps (read as UTC) and epoch millis.
/// Anything else becomes `None` instead of failing the whole payload.
pub(crate) fn lenient_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer).unwrap_or(None);
    Ok(raw.and_then(|raw| match raw {
        RawTimestamp::Text(text) => parse_timestamp(&text),
        RawTimestamp::Millis(millis) => DateTime::<Utc>::from_timestamp_millis(millis),
    }))
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
