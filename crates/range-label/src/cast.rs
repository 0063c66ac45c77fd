//! Lenient conversion of loosely typed values (JSON) into ranges and datetimes.
//!
//! Nothing here returns an error. A value that cannot be cast yields `None`, or
//! comes back untouched from the `*_or_leave_as_is` variants.

use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use tracing::debug;

use crate::calendar::parse_iso8601;
use crate::interval::Interval;

/// Result of a "leave as is" cast: the converted value, or the input unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Castable<T> {
    Cast(T),
    AsIs(Value),
}

impl<T> Castable<T> {
    pub fn is_cast(&self) -> bool {
        matches!(self, Castable::Cast(_))
    }

    /// The converted value, if the cast succeeded.
    pub fn cast(self) -> Option<T> {
        match self {
            Castable::Cast(value) => Some(value),
            Castable::AsIs(_) => None,
        }
    }
}

impl From<Castable<Interval>> for Value {
    fn from(castable: Castable<Interval>) -> Self {
        match castable {
            Castable::Cast(interval) => Value::String(interval.to_string()),
            Castable::AsIs(value) => value,
        }
    }
}

impl From<Castable<DateTime<FixedOffset>>> for Value {
    fn from(castable: Castable<DateTime<FixedOffset>>) -> Self {
        match castable {
            Castable::Cast(datetime) => Value::String(datetime.to_rfc3339()),
            Castable::AsIs(value) => value,
        }
    }
}

/// Cast `"<ISO8601>/<ISO8601>"` strings to an [`Interval`] with the default
/// options. Numbers and every other JSON type are rejected.
pub fn cast_range(value: &Value) -> Option<Interval> {
    let Value::String(s) = value else {
        return None;
    };
    match Interval::parse(s) {
        Ok(interval) => Some(interval),
        Err(e) => {
            debug!(value = %s, error = %e, "Not a range");
            None
        }
    }
}

/// Like [`cast_range`], handing back `value` itself when it is not a range.
pub fn cast_range_or_leave_as_is(value: Value) -> Castable<Interval> {
    match cast_range(&value) {
        Some(interval) => Castable::Cast(interval),
        None => Castable::AsIs(value),
    }
}

/// Cast a string to a single datetime: the start of a range string, or a strict
/// ISO-8601 datetime. Values without an offset are read as UTC.
pub fn cast_datetime(value: &Value) -> Option<DateTime<FixedOffset>> {
    let Value::String(s) = value else {
        return None;
    };
    if s.contains('/') {
        return cast_range(value).map(|interval| interval.start());
    }
    match parse_iso8601(s, None) {
        Ok(datetime) => Some(datetime),
        Err(e) => {
            debug!(value = %s, error = %e, "Not a datetime");
            None
        }
    }
}

/// Like [`cast_datetime`], handing back `value` itself when it cannot be cast.
pub fn cast_datetime_or_leave_as_is(value: Value) -> Castable<DateTime<FixedOffset>> {
    match cast_datetime(&value) {
        Some(datetime) => Castable::Cast(datetime),
        None => Castable::AsIs(value),
    }
}
