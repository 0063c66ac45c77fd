//! Zoned calendar arithmetic over a pair of timestamps.
//!
//! A [`Span`] stores the two endpoints exactly as they were written (instant plus
//! the offset they carried). Every calendar question is asked through a
//! [`Moment`], which is an endpoint viewed in a particular zone: either a named
//! IANA zone, or "floating" time where each endpoint keeps its own offset.
//!
//! Sub-day units are measured on absolute instants. Days and coarser units are
//! measured on the wall clock of the viewing zone, so a day across a DST switch
//! is still one day even though it lasts 23 or 25 hours.

use chrono::{
    DateTime, Datelike, Days, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::RangeError;

// ── Units ───────────────────────────────────────────────────────────────────

/// A calendar unit that durations can be counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Semester,
    Year,
}

impl TimeUnit {
    /// Length in seconds for units that have a fixed length.
    fn fixed_seconds(self) -> Option<i64> {
        match self {
            TimeUnit::Second => Some(1),
            TimeUnit::Minute => Some(60),
            TimeUnit::Hour => Some(3_600),
            _ => None,
        }
    }

    /// Length in calendar months for month-based units.
    fn months(self) -> Option<u32> {
        match self {
            TimeUnit::Month => Some(1),
            TimeUnit::Quarter => Some(3),
            TimeUnit::Semester => Some(6),
            TimeUnit::Year => Some(12),
            _ => None,
        }
    }
}

// ── Moment ──────────────────────────────────────────────────────────────────

/// One endpoint viewed in a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    zoned: DateTime<FixedOffset>,
}

impl Moment {
    /// View `dt` in `zone`, or at its own offset when the zone is floating.
    pub fn in_zone(dt: &DateTime<FixedOffset>, zone: Option<&Tz>) -> Self {
        let zoned = match zone {
            Some(tz) => {
                let local = dt.with_timezone(tz);
                local.with_timezone(&local.offset().fix())
            }
            None => *dt,
        };
        Self { zoned }
    }

    /// The endpoint with the offset in effect in the viewing zone.
    pub fn zoned(&self) -> DateTime<FixedOffset> {
        self.zoned
    }

    /// The absolute instant.
    pub fn instant(&self) -> DateTime<Utc> {
        self.zoned.with_timezone(&Utc)
    }

    /// Wall-clock time in the viewing zone.
    pub fn local(&self) -> NaiveDateTime {
        self.zoned.naive_local()
    }

    pub fn is_start_of_day(&self) -> bool {
        self.local().time() == NaiveTime::MIN
    }

    pub fn is_start_of_year(&self) -> bool {
        let local = self.local();
        self.is_start_of_day() && local.month() == 1 && local.day() == 1
    }

    pub fn second(&self) -> u32 {
        self.zoned.second()
    }

    pub fn minute(&self) -> u32 {
        self.zoned.minute()
    }

    pub fn hour(&self) -> u32 {
        self.zoned.hour()
    }

    pub fn day(&self) -> u32 {
        self.zoned.day()
    }
}

// ── Span ────────────────────────────────────────────────────────────────────

/// A pair of timestamps. No ordering between the two is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl Span {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    /// Both endpoints viewed in `zone`.
    pub fn view(&self, zone: Option<&Tz>) -> (Moment, Moment) {
        (
            Moment::in_zone(&self.start, zone),
            Moment::in_zone(&self.end, zone),
        )
    }
}

/// Count whole `unit`s from `start` to `end`, truncated toward zero.
///
/// Month-based units follow calendar subtraction: Jan 31 → Feb 28 is one month,
/// Jan 15 → Feb 10 is zero.
pub fn duration_between(start: &Moment, end: &Moment, unit: TimeUnit) -> i64 {
    if let Some(secs) = unit.fixed_seconds() {
        return (end.instant() - start.instant()).num_seconds() / secs;
    }

    let (from, to) = (start.local(), end.local());
    match unit {
        TimeUnit::Day => (to - from).num_days(),
        TimeUnit::Week => (to - from).num_days() / 7,
        _ => {
            let per_unit = i64::from(unit.months().unwrap_or(1));
            month_diff(from, to) / per_unit
        }
    }
}

/// Whether `end` is exactly `count` `unit`s after `start`.
pub fn spans_exactly(start: &Moment, end: &Moment, unit: TimeUnit, count: u32) -> bool {
    if let Some(secs) = unit.fixed_seconds() {
        let expected = chrono::Duration::seconds(secs * i64::from(count));
        return end.instant() - start.instant() == expected;
    }

    let from = start.local();
    let shifted = match unit {
        TimeUnit::Day => from.checked_add_days(Days::new(u64::from(count))),
        TimeUnit::Week => from.checked_add_days(Days::new(7 * u64::from(count))),
        _ => unit
            .months()
            .and_then(|months| months.checked_mul(count))
            .and_then(|months| from.checked_add_months(Months::new(months))),
    };
    shifted == Some(end.local())
}

fn month_diff(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    let whole = i64::from(to.year() - from.year()) * 12 + i64::from(to.month())
        - i64::from(from.month());
    let Some(anchor) = add_months(from, whole) else {
        return whole;
    };
    if whole > 0 && anchor > to {
        whole - 1
    } else if whole < 0 && anchor < to {
        whole + 1
    } else {
        whole
    }
}

fn add_months(dt: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        dt.checked_add_months(magnitude)
    } else {
        dt.checked_sub_months(magnitude)
    }
}

// ── Strict ISO-8601 parsing ─────────────────────────────────────────────────

/// Parse one strict ISO-8601 endpoint.
///
/// Accepted shapes are `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM`, `YYYY-MM-DDTHH:MM:SS` and
/// `YYYY-MM-DDTHH:MM:SS.fff`, the time forms optionally followed by `Z`, `±HH:MM`,
/// `±HHMM` or `±HH`. Values without an offset are read in `zone` (UTC when
/// floating).
///
/// # Errors
///
/// Returns `RangeError::InvalidDatetime` when the shape is off, a field is out
/// of range, or a date-only value falls in a gap of `zone`.
pub fn parse_iso8601(s: &str, zone: Option<&Tz>) -> Result<DateTime<FixedOffset>, RangeError> {
    let invalid = |reason: &str| RangeError::InvalidDatetime(format!("'{s}': {reason}"));
    let shape = IsoShape::of(s).ok_or_else(|| invalid("not a strict ISO-8601 datetime"))?;

    let Some(clock) = shape.clock else {
        let date = NaiveDate::parse_from_str(shape.date, "%Y-%m-%d")
            .map_err(|e| invalid(&e.to_string()))?;
        return localize(date.and_time(NaiveTime::MIN), zone)
            .ok_or_else(|| invalid("no such local time"));
    };

    match shape.offset {
        Some(offset) => DateTime::parse_from_rfc3339(&format!("{}T{clock}{offset}", shape.date))
            .map_err(|e| invalid(&e.to_string())),
        None => {
            let text = format!("{}T{clock}", shape.date);
            let naive = NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f")
                .map_err(|e| invalid(&e.to_string()))?;
            localize(naive, zone).ok_or_else(|| invalid("no such local time"))
        }
    }
}

/// A string that has the layout of a strict ISO-8601 endpoint, normalized so
/// chrono's parsers accept it: seconds always present, offset as `±HH:MM`.
struct IsoShape<'a> {
    date: &'a str,
    clock: Option<String>,
    offset: Option<String>,
}

impl<'a> IsoShape<'a> {
    fn of(s: &'a str) -> Option<Self> {
        let date = s.get(..10).filter(|date| has_shape(date, "dddd-dd-dd"))?;
        let rest = &s[10..];
        if rest.is_empty() {
            return Some(Self { date, clock: None, offset: None });
        }

        let rest = rest.strip_prefix('T')?;
        let (clock, offset) = match rest.find(['Z', '+', '-']) {
            Some(idx) => (&rest[..idx], Some(normalize_offset(&rest[idx..])?)),
            None => (rest, None),
        };
        let clock = match clock.split_once('.') {
            Some((hms, fraction))
                if has_shape(hms, "dd:dd:dd")
                    && (1..=9).contains(&fraction.len())
                    && fraction.bytes().all(|b| b.is_ascii_digit()) =>
            {
                clock.to_owned()
            }
            None if has_shape(clock, "dd:dd:dd") => clock.to_owned(),
            None if has_shape(clock, "dd:dd") => format!("{clock}:00"),
            _ => return None,
        };

        Some(Self { date, clock: Some(clock), offset })
    }
}

/// `d` in `pattern` matches an ASCII digit, every other byte matches itself.
fn has_shape(s: &str, pattern: &str) -> bool {
    s.len() == pattern.len()
        && s.bytes().zip(pattern.bytes()).all(|(b, p)| match p {
            b'd' => b.is_ascii_digit(),
            _ => b == p,
        })
}

fn normalize_offset(s: &str) -> Option<String> {
    if s == "Z" {
        return Some("+00:00".to_owned());
    }
    let (sign, body) = s.split_at(1);
    if has_shape(body, "dd:dd") {
        Some(s.to_owned())
    } else if has_shape(body, "dddd") {
        Some(format!("{sign}{}:{}", &body[..2], &body[2..]))
    } else if has_shape(body, "dd") {
        Some(format!("{sign}{body}:00"))
    } else {
        None
    }
}

fn localize(naive: NaiveDateTime, zone: Option<&Tz>) -> Option<DateTime<FixedOffset>> {
    match zone {
        Some(tz) => {
            let local = tz.from_local_datetime(&naive).earliest()?;
            Some(local.with_timezone(&local.offset().fix()))
        }
        None => Some(FixedOffset::east_opt(0)?.from_utc_datetime(&naive)),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
