//! Canonical periods and the classifier that recognizes them.

use std::fmt;

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::calendar::{duration_between, spans_exactly, Moment, TimeUnit};

/// A canonical human period a range can represent.
///
/// Ranges that match none of these are classified as `None` at the call site
/// (`Option<Period>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    #[serde(rename = "isoweek")]
    IsoWeek,
    Month,
    Quarter,
    Semester,
    Year,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Second => "second",
            Period::Minute => "minute",
            Period::Hour => "hour",
            Period::Day => "day",
            Period::Week => "week",
            Period::IsoWeek => "isoweek",
            Period::Month => "month",
            Period::Quarter => "quarter",
            Period::Semester => "semester",
            Period::Year => "year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the range `[start, end)` viewed in one zone.
///
/// Checks run from the finest period to the coarsest and the first match wins.
/// A start that is not on a clean boundary for the next granularity stops the
/// search: a range starting at 10:00:30 is never an hour, day or month.
///
/// `first_weekday` is the locale's first day of the week, used by the `week`
/// check only. When it is Monday, `week` shadows `isoweek`.
///
/// Month, quarter and semester need a whole calendar month count of exactly 1,
/// 3 or 6, and year a whole year count of 1. Counts are truncated, so a quarter
/// whose end was written at the winter offset still counts once the zone has
/// moved to summer time.
pub fn classify(start: &Moment, end: &Moment, first_weekday: Weekday) -> Option<Period> {
    let period = classify_inner(start, end, first_weekday);
    trace!(
        start = %start.zoned(),
        end = %end.zoned(),
        period = period.map_or("none", |p| p.as_str()),
        "Classified range"
    );
    period
}

fn classify_inner(start: &Moment, end: &Moment, first_weekday: Weekday) -> Option<Period> {
    if spans_exactly(start, end, TimeUnit::Second, 1) {
        return Some(Period::Second);
    }

    if start.second() != 0 {
        return None;
    }
    if spans_exactly(start, end, TimeUnit::Minute, 1) {
        return Some(Period::Minute);
    }

    if start.minute() != 0 {
        return None;
    }
    if spans_exactly(start, end, TimeUnit::Hour, 1) {
        return Some(Period::Hour);
    }

    if start.hour() != 0 {
        return None;
    }
    if spans_exactly(start, end, TimeUnit::Day, 1) {
        return Some(Period::Day);
    }

    let weekday = start.local().weekday();
    let one_week = spans_exactly(start, end, TimeUnit::Week, 1);
    if one_week && weekday == first_weekday {
        return Some(Period::Week);
    }
    if one_week && weekday == Weekday::Mon {
        return Some(Period::IsoWeek);
    }

    if start.day() != 1 {
        return None;
    }

    match duration_between(start, end, TimeUnit::Month) {
        1 => Some(Period::Month),
        3 => Some(Period::Quarter),
        6 => Some(Period::Semester),
        _ if duration_between(start, end, TimeUnit::Year) == 1 => Some(Period::Year),
        _ => None,
    }
}
