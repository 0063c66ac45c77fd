//! The [`Interval`] value: two endpoints, a locale, a timezone and the period
//! the range represents.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Offset, TimeZone};
use chrono_tz::Tz;
use tracing::debug;

use crate::calendar::{duration_between, parse_iso8601, Moment, Span, TimeUnit};
use crate::config::IntervalOptions;
use crate::error::RangeError;
use crate::format::{RangeFormatter, Simplify};
use crate::locale::{normalize_tag, CalendarLocale};
use crate::period::{classify, Period};
use crate::templates::LocaleTemplateStore;

/// A date-time range with the period it represents.
///
/// Endpoints are fixed once built. Locale and timezone changes go through
/// [`with_locale`](Self::with_locale) and [`with_timezone`](Self::with_timezone),
/// which return a new value with the period recomputed, so the period is never
/// stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    span: Span,
    locale: String,
    default_locale: String,
    timezone: Option<Tz>,
    period: Option<Period>,
}

impl Interval {
    /// Build from two timestamps with the default options (`en`, floating time).
    ///
    /// The timezone of `T` only provides the offsets; use
    /// [`with_timezone`](Self::with_timezone) to view the range in a named zone.
    pub fn new<T: TimeZone>(start: DateTime<T>, end: DateTime<T>) -> Self {
        Self::with_options(start, end, &IntervalOptions::default())
    }

    /// Build from two timestamps, starting from `options`.
    pub fn with_options<T: TimeZone>(
        start: DateTime<T>,
        end: DateTime<T>,
        options: &IntervalOptions,
    ) -> Self {
        let span = Span::new(fix(&start), fix(&end));
        Self::from_span(span, options)
    }

    /// Parse `"<ISO8601>/<ISO8601>"` with the default options.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::InvalidRange`] unless the string has exactly one `/`,
    /// or [`RangeError::InvalidDatetime`] if either side is not strict ISO-8601.
    ///
    /// # Examples
    ///
    /// ```
    /// use range_label::{Interval, Period};
    ///
    /// let range = Interval::parse("2017-01-01T00:00:00Z/2017-02-01T00:00:00Z").unwrap();
    /// assert_eq!(range.period(), Some(Period::Month));
    /// assert_eq!(range.format(false, false), "January 2017");
    /// ```
    pub fn parse(s: &str) -> Result<Self, RangeError> {
        Self::parse_with_options(s, &IntervalOptions::default())
    }

    /// Parse `"<ISO8601>/<ISO8601>"`, starting from `options`. Endpoints written
    /// without an offset are read in `options.timezone`.
    ///
    /// # Errors
    ///
    /// See [`parse`](Self::parse).
    pub fn parse_with_options(s: &str, options: &IntervalOptions) -> Result<Self, RangeError> {
        let mut parts = s.split('/');
        let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(RangeError::InvalidRange(format!(
                "'{s}': expected exactly one '/' separator"
            )));
        };

        let zone = options.timezone.as_ref();
        let span = Span::new(parse_iso8601(start, zone)?, parse_iso8601(end, zone)?);
        Ok(Self::from_span(span, options))
    }

    fn from_span(span: Span, options: &IntervalOptions) -> Self {
        let locale = normalize_tag(&options.locale);
        let mut interval = Self {
            span,
            default_locale: locale.clone(),
            locale,
            timezone: options.timezone,
            period: None,
        };
        interval.period = interval.classify();
        interval
    }

    fn classify(&self) -> Option<Period> {
        let (start, end) = self.moments();
        classify(&start, &end, self.calendar_locale().first_weekday())
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// The period this range represents, `None` when it matches no canonical one.
    pub fn period(&self) -> Option<Period> {
        self.period
    }

    /// The active locale tag (lowercase, `-`-separated).
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The active timezone, `None` for floating time.
    pub fn timezone(&self) -> Option<Tz> {
        self.timezone
    }

    /// Start, with the offset in effect in the active timezone.
    pub fn start(&self) -> DateTime<FixedOffset> {
        self.moments().0.zoned()
    }

    /// End, with the offset in effect in the active timezone.
    pub fn end(&self) -> DateTime<FixedOffset> {
        self.moments().1.zoned()
    }

    pub(crate) fn moments(&self) -> (Moment, Moment) {
        self.span.view(self.timezone.as_ref())
    }

    /// Calendar data for the active locale, falling back to the base locale.
    pub(crate) fn calendar_locale(&self) -> &'static CalendarLocale {
        CalendarLocale::resolve(&self.locale).unwrap_or_else(CalendarLocale::base)
    }

    // ── Locale / timezone ───────────────────────────────────────────────

    /// Switch locale. `None` restores the locale the interval was built with.
    ///
    /// A tag known neither to the calendar data nor to the bundled templates,
    /// not even by its primary subtag, is ignored and the current locale is kept.
    pub fn with_locale(self, tag: Option<&str>) -> Self {
        self.with_locale_in(tag, LocaleTemplateStore::builtin())
    }

    /// Switch locale, also accepting tags that only `store` has templates for.
    /// Such a locale renders its own templates with the base locale's names.
    pub fn with_locale_in(mut self, tag: Option<&str>, store: &LocaleTemplateStore) -> Self {
        match tag {
            Some(tag) if !knows_locale(tag, store) => {
                debug!(locale = tag, current = %self.locale, "Ignoring unknown locale");
                return self;
            }
            Some(tag) => self.locale = normalize_tag(tag),
            None => self.locale = self.default_locale.clone(),
        }
        self.period = self.classify();
        self
    }

    /// Switch locale, failing instead of ignoring an unknown tag.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::InvalidLocale`] if neither `tag` nor its primary
    /// subtag has calendar data or bundled templates.
    pub fn try_with_locale(self, tag: &str) -> Result<Self, RangeError> {
        if !knows_locale(tag, LocaleTemplateStore::builtin()) {
            return Err(RangeError::InvalidLocale(format!("'{tag}'")));
        }
        Ok(self.with_locale(Some(tag)))
    }

    /// Switch timezone. `None` clears it to floating time.
    pub fn with_timezone(mut self, zone: Option<Tz>) -> Self {
        self.timezone = zone;
        self.period = self.classify();
        self
    }

    /// Switch to the IANA timezone `name`.
    ///
    /// An unknown name is an error, the zone is not cleared. Use
    /// `with_timezone(None)` for floating time.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::InvalidTimezone`] if `name` is not a known IANA zone.
    pub fn with_timezone_name(self, name: &str) -> Result<Self, RangeError> {
        let tz = name
            .parse::<Tz>()
            .map_err(|_| RangeError::InvalidTimezone(format!("'{name}'")))?;
        Ok(self.with_timezone(Some(tz)))
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Whole `unit`s between start and end in the active timezone, truncated
    /// toward zero. Months, quarters, semesters and years are counted on the
    /// calendar, not by dividing a number of seconds.
    pub fn duration_in(&self, unit: TimeUnit) -> i64 {
        let (start, end) = self.moments();
        duration_between(&start, &end, unit)
    }

    /// Render the range with the bundled templates.
    ///
    /// `simplify` is `false`, `true` (always drop context) or a parent
    /// `&Interval` (drop context this range shares with the parent).
    pub fn format<'a>(&self, short: bool, simplify: impl Into<Simplify<'a>>) -> String {
        RangeFormatter::default().format(self, short, simplify)
    }
}

fn knows_locale(tag: &str, store: &LocaleTemplateStore) -> bool {
    CalendarLocale::resolve(tag).is_some() || store.resolves(tag)
}

fn fix<T: TimeZone>(dt: &DateTime<T>) -> DateTime<FixedOffset> {
    dt.with_timezone(&dt.offset().fix())
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end) = self.moments();
        write!(f, "{}/{}", start.zoned().to_rfc3339(), end.zoned().to_rfc3339())
    }
}

impl FromStr for Interval {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn parse(s: &str) -> Interval {
        Interval::parse(s).unwrap()
    }

    // ── Construction ────────────────────────────────────────────────────

    #[test]
    fn test_parse_rejects_wrong_separator_count() {
        for input in [
            "2017-01-01T00:00:00Z",
            "2017-01-01T00:00:00Z/2017-02-01T00:00:00Z/2017-03-01T00:00:00Z",
            "",
        ] {
            let err = Interval::parse(input).unwrap_err();
            assert!(matches!(err, RangeError::InvalidRange(_)), "{input:?}: {err}");
        }
    }

    #[test]
    fn test_parse_rejects_non_iso_side() {
        let err = Interval::parse("2017-01-01 00:00:00/2017-02-01T00:00:00Z").unwrap_err();
        assert!(err.to_string().contains("Invalid datetime"), "got: {err}");
    }

    #[test]
    fn test_new_from_chrono_values() {
        let start = Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2017, 4, 1, 0, 0, 0).unwrap();
        let range = Interval::new(start, end);
        assert_eq!(range.period(), Some(Period::Quarter));
        assert_eq!(range.locale(), "en");
        assert_eq!(range.timezone(), None);
    }

    #[test]
    fn test_from_str_and_display() {
        let range: Interval = "2017-01-01T00:00:00+01:00/2017-02-01T00:00:00+01:00"
            .parse()
            .unwrap();
        assert_eq!(
            range.to_string(),
            "2017-01-01T00:00:00+01:00/2017-02-01T00:00:00+01:00"
        );
        let utc = range.with_timezone(Some(Tz::UTC));
        assert_eq!(
            utc.to_string(),
            "2016-12-31T23:00:00+00:00/2017-01-31T23:00:00+00:00"
        );
    }

    #[test]
    fn test_options_snapshot() {
        let options = IntervalOptions::new("fr", Some(Tz::Europe__Paris));
        let range =
            Interval::parse_with_options("2017-01-01T00:00:00/2017-02-01T00:00:00", &options)
                .unwrap();
        assert_eq!(range.locale(), "fr");
        assert_eq!(range.timezone(), Some(Tz::Europe__Paris));
        assert_eq!(range.start().to_rfc3339(), "2017-01-01T00:00:00+01:00");
        assert_eq!(range.period(), Some(Period::Month));
    }

    // ── Locale ──────────────────────────────────────────────────────────

    #[test]
    fn test_locale_change_and_restore() {
        let range = parse("2017-01-01T00:00:00Z/2017-02-01T00:00:00Z");
        assert_eq!(range.locale(), "en");

        let range = range.with_locale(Some("fr"));
        assert_eq!(range.locale(), "fr");

        // Unknown tags are ignored
        let range = range.with_locale(Some("tq"));
        assert_eq!(range.locale(), "fr");

        let range = range.with_locale(None);
        assert_eq!(range.locale(), "en");
    }

    #[test]
    fn test_try_with_locale() {
        let range = parse("2017-01-01T00:00:00Z/2017-02-01T00:00:00Z");
        let err = range.clone().try_with_locale("tq").unwrap_err();
        assert!(matches!(err, RangeError::InvalidLocale(_)), "got: {err}");
        assert_eq!(range.try_with_locale("de").unwrap().locale(), "de");
    }

    #[test]
    fn test_locale_with_known_primary_subtag_is_kept_verbatim() {
        let range = parse("2017-01-01T00:00:00Z/2017-02-01T00:00:00Z").with_locale(Some("fr-CA"));
        assert_eq!(range.locale(), "fr-ca");
    }

    #[test]
    fn test_locale_does_not_change_values() {
        let range = parse("2017-02-28T12:34:56+00:00/2017-02-28T12:34:56+00:00")
            .with_timezone(Some(Tz::UTC));
        let before = range.start();
        let range = range.with_locale(Some("fr"));
        assert_eq!(range.locale(), "fr");
        assert_eq!(before, range.start());
    }

    #[test]
    fn test_locale_from_custom_templates() {
        let store =
            LocaleTemplateStore::from_json(r#"{"it": {"month": ["MMM YY", "[mese] MMMM YYYY"]}}"#)
                .unwrap();
        let range = parse("2017-01-01T00:00:00Z/2017-02-01T00:00:00Z").with_timezone(Some(Tz::UTC));

        // Bundled data knows nothing about "it"
        let plain = range.clone().with_locale(Some("it"));
        assert_eq!(plain.locale(), "en");

        let range = range.with_locale_in(Some("it"), &store);
        assert_eq!(range.locale(), "it");
        assert_eq!(range.period(), Some(Period::Month));
        assert_eq!(
            RangeFormatter::new(&store).format(&range, false, false),
            "mese January 2017"
        );
    }

    #[test]
    fn test_locale_reclassifies_weeks() {
        // Monday to Monday
        let range = parse("2017-10-02T00:00:00Z/2017-10-09T00:00:00Z").with_timezone(Some(Tz::UTC));
        assert_eq!(range.period(), Some(Period::IsoWeek));
        let range = range.with_locale(Some("fr"));
        assert_eq!(range.period(), Some(Period::Week));
        let range = range.with_locale(Some("en-US"));
        assert_eq!(range.period(), Some(Period::IsoWeek));
    }

    // ── Timezone ────────────────────────────────────────────────────────

    #[test]
    fn test_timezone_change_and_clear() {
        let range = parse("2017-02-28T12:34:56+00:00/2017-02-28T12:34:56+00:00");
        assert_eq!(range.timezone(), None);

        let range = range.with_timezone_name("America/Los_Angeles").unwrap();
        assert_eq!(range.timezone(), Some(Tz::America__Los_Angeles));

        let range = range.with_timezone(None);
        assert_eq!(range.timezone(), None);
    }

    #[test]
    fn test_invalid_timezone_name() {
        let range = parse("2017-02-28T12:34:56+00:00/2017-02-28T12:34:56+00:00");
        let err = range.with_timezone_name("Europe/Lyon").unwrap_err();
        assert!(err.to_string().contains("Invalid timezone"), "got: {err}");
    }

    #[test]
    fn test_timezone_changes_values() {
        use chrono::Timelike;
        let range = parse("2017-02-28T12:34:56+00:00/2017-02-28T12:34:56+00:00");
        assert_eq!(range.clone().with_timezone(Some(Tz::UTC)).start().hour(), 12);
        assert_eq!(range.with_timezone(Some(Tz::Asia__Tokyo)).start().hour(), 21);
    }

    #[test]
    fn test_timezone_reclassifies() {
        let range = parse("2017-01-01T00:00:00+01:00/2017-02-01T00:00:00+01:00");
        assert_eq!(range.period(), Some(Period::Month));

        let range = range.with_timezone(Some(Tz::UTC));
        assert_eq!(range.period(), None);

        let range = range.with_timezone_name("Australia/Eucla").unwrap();
        assert_eq!(range.period(), None);

        let range = range.with_timezone(Some(Tz::Europe__Paris));
        assert_eq!(range.period(), Some(Period::Month));
    }

    // ── Durations ───────────────────────────────────────────────────────

    #[test]
    fn test_duration_in_units() {
        let range = parse("2016-01-01T00:00:00Z/2016-01-01T01:00:00Z");
        assert_eq!(range.duration_in(TimeUnit::Second), 3_600);
        assert_eq!(range.duration_in(TimeUnit::Minute), 60);
        assert_eq!(range.duration_in(TimeUnit::Hour), 1);
        assert_eq!(range.duration_in(TimeUnit::Day), 0);
    }

    #[test]
    fn test_duration_in_months_follows_zone() {
        // Paris midnight on both sides, so one calendar month there
        let range = parse("2017-03-01T00:00:00+01:00/2017-04-01T00:00:00+02:00")
            .with_timezone(Some(Tz::Europe__Paris));
        assert_eq!(range.duration_in(TimeUnit::Month), 1);
        assert_eq!(range.duration_in(TimeUnit::Hour), 743);

        // In UTC the end falls one hour short of March 31 midnight + 1 month
        let utc = range.with_timezone(Some(Tz::UTC));
        assert_eq!(utc.duration_in(TimeUnit::Month), 1);
        assert_eq!(utc.period(), None);
    }
}
