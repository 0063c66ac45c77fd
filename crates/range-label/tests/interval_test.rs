//! Classification across timezone and locale changes.

use chrono::Timelike;
use chrono_tz::Tz;
use range_label::{Interval, Period, TimeUnit};

/// Period after each step of a chain of zone/locale changes.
fn periods(range: &str, steps: &[(&str, Option<&str>)]) -> Vec<Option<Period>> {
    let mut interval = Interval::parse(range).unwrap();
    let mut seen = vec![interval.period()];
    for (zone, locale) in steps {
        interval = interval.with_timezone_name(zone).unwrap();
        if let Some(locale) = locale {
            interval = interval.with_locale(Some(*locale));
        }
        seen.push(interval.period());
    }
    seen
}

const ZONES: &[(&str, Option<&str>)] = &[
    ("UTC", None),
    ("Australia/Eucla", Some("en-au")),
    ("Europe/Paris", None),
    ("Europe/Paris", Some("fr")),
];

// ── Sub-day periods ─────────────────────────────────────────────────────────

#[test]
fn test_minute_in_every_zone() {
    let seen = periods("2017-01-01T00:00:00+00:00/2017-01-01T00:01:00+00:00", ZONES);
    assert!(seen.iter().all(|p| *p == Some(Period::Minute)), "{seen:?}");
}

#[test]
fn test_hour_breaks_on_quarter_hour_offsets() {
    let seen = periods("2017-01-01T00:00:00+00:00/2017-01-01T01:00:00+00:00", ZONES);
    assert_eq!(
        seen,
        vec![
            Some(Period::Hour),
            Some(Period::Hour),
            None,
            Some(Period::Hour),
            Some(Period::Hour),
        ]
    );
}

#[test]
fn test_day_only_at_local_midnight() {
    let seen = periods("2017-01-01T00:00:00+00:00/2017-01-02T00:00:00+00:00", ZONES);
    assert_eq!(seen, vec![Some(Period::Day), Some(Period::Day), None, None, None]);
}

// ── Weeks ───────────────────────────────────────────────────────────────────

#[test]
fn test_monday_week_follows_locale() {
    // Monday January 2nd at Paris midnight
    let range = Interval::parse("2017-01-02T00:00:00+01:00/2017-01-09T00:00:00+01:00").unwrap();
    assert_eq!(range.period(), Some(Period::IsoWeek));

    let range = range.with_timezone(Some(Tz::UTC));
    assert_eq!(range.period(), None);

    let range = range.with_timezone(Some(Tz::Europe__Paris));
    assert_eq!(range.period(), Some(Period::IsoWeek));

    let range = range.with_locale(Some("fr"));
    assert_eq!(range.period(), Some(Period::Week));

    let range = range.with_locale(Some("en-US"));
    assert_eq!(range.period(), Some(Period::IsoWeek));
}

// ── Calendar periods ────────────────────────────────────────────────────────

#[test]
fn test_calendar_periods_at_paris_midnight() {
    let cases = [
        ("2017-01-01T00:00:00+01:00/2017-02-01T00:00:00+01:00", Period::Month),
        ("2017-01-01T00:00:00+01:00/2017-04-01T00:00:00+01:00", Period::Quarter),
        ("2017-01-01T00:00:00+01:00/2017-07-01T00:00:00+01:00", Period::Semester),
        ("2017-01-01T00:00:00+01:00/2018-01-01T00:00:00+01:00", Period::Year),
    ];
    for (range, period) in cases {
        let seen = periods(range, ZONES);
        assert_eq!(
            seen,
            vec![Some(period), None, None, Some(period), Some(period)],
            "{range}"
        );
    }
}

#[test]
fn test_month_across_dst_switch() {
    let range = Interval::parse("2017-03-01T00:00:00+01:00/2017-04-01T00:00:00+02:00").unwrap();
    assert_eq!(range.period(), Some(Period::Month));

    let range = range.with_timezone(Some(Tz::UTC));
    assert_eq!(range.period(), None);

    let range = range
        .with_timezone(Some(Tz::Europe__Paris))
        .with_locale(Some("fr"));
    assert_eq!(range.period(), Some(Period::Month));
    assert_eq!(range.format(false, false), "mars 2017");
}

#[test]
fn test_quarter_across_dst_in_new_york() {
    let range = Interval::parse("2017-01-01T00:00:00-05:00/2017-04-01T00:00:00-04:00")
        .unwrap()
        .with_timezone_name("America/New_York")
        .unwrap();
    assert_eq!(range.period(), Some(Period::Quarter));
    assert_eq!(range.duration_in(TimeUnit::Month), 3);
    assert_eq!(range.duration_in(TimeUnit::Quarter), 1);
}

// ── Values ──────────────────────────────────────────────────────────────────

#[test]
fn test_timezone_changes_wall_clock_not_instant() {
    let range = Interval::parse("2017-02-28T12:34:56+00:00/2017-02-28T12:34:56+00:00").unwrap();
    let utc = range.clone().with_timezone(Some(Tz::UTC));
    let tokyo = range.with_timezone(Some(Tz::Asia__Tokyo));
    assert_eq!(utc.start().hour(), 12);
    assert_eq!(tokyo.start().hour(), 21);
    assert_eq!(utc.start(), tokyo.start());
}

#[test]
fn test_duration_in() {
    let range = Interval::parse("2016-01-01T00:00:00Z/2016-01-01T01:00:00Z").unwrap();
    assert_eq!(range.duration_in(TimeUnit::Second), 3_600);
    assert_eq!(range.duration_in(TimeUnit::Hour), 1);

    let range = Interval::parse("2016-01-01T00:00:00Z/2017-01-01T00:00:00Z").unwrap();
    assert_eq!(range.duration_in(TimeUnit::Day), 366);
    assert_eq!(range.duration_in(TimeUnit::Week), 52);
    assert_eq!(range.duration_in(TimeUnit::Month), 12);
    assert_eq!(range.duration_in(TimeUnit::Semester), 2);
    assert_eq!(range.duration_in(TimeUnit::Year), 1);
}
