//! Timestamp coercion for mapped fields

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{MapError, MapResult};
use crate::value::{MappedObject, Value};

/// Format used by the API for ISO-8601 timestamps, e.g. `2022-03-14T17:00:00.000Z`.
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Coerce an epoch-millisecond number or an ISO-8601 string into a UTC timestamp.
pub fn coerce_timestamp(value: &Value) -> MapResult<DateTime<Utc>> {
    match value {
        Value::DateTime(dt) => Ok(*dt),
        Value::Number(n) => {
            let millis = n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .ok_or_else(|| MapError::InvalidTimestamp(n.to_string()))?;
            DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| MapError::InvalidTimestamp(n.to_string()))
        }
        Value::String(s) => parse_iso(s),
        other => Err(MapError::InvalidTimestamp(format!(
            "expected epoch milliseconds or an ISO-8601 string, found {}",
            other.type_name()
        ))),
    }
}

fn parse_iso(s: &str) -> MapResult<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, ISO_FORMAT) {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| MapError::InvalidTimestamp(s.to_string()))
}

/// Replace a required attribute with its coerced timestamp.
pub(crate) fn coerce_field(obj: &mut MappedObject, name: &str) -> MapResult<()> {
    let slot = obj
        .get_mut(name)
        .ok_or_else(|| MapError::MissingAttribute(name.to_string()))?;
    *slot = Value::DateTime(coerce_timestamp(slot)?);
    Ok(())
}

/// Replace an attribute with its coerced timestamp when it is present and not null.
pub(crate) fn coerce_optional_field(obj: &mut MappedObject, name: &str) -> MapResult<()> {
    match obj.get_mut(name) {
        Some(slot) if !slot.is_null() => {
            *slot = Value::DateTime(coerce_timestamp(slot)?);
            Ok(())
        }
        _ => Ok(()),
    }
}
