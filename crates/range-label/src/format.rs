//! Rendering an [`Interval`] as a human label.
//!
//! The classified period picks a [`TemplateCategory`]. Within it, one of four
//! templates is chosen: short or long, full or simplified. A simplified template
//! drops context (usually the year) that a surrounding heading already shows.
//!
//! With a parent range, a child is simplified unless it starts either at the
//! beginning of its pivot unit (day for time-of-day labels, year otherwise) or
//! exactly where the parent starts. The first child of a parent therefore
//! carries the full context and the following ones do not:
//!
//! ```
//! use range_label::Interval;
//! use chrono_tz::Tz;
//!
//! let parent = Interval::parse("2017-01-01T00:00:00Z/2017-02-01T00:00:00Z")
//!     .unwrap()
//!     .with_timezone(Some(Tz::UTC));
//! let first = Interval::parse("2017-01-01T00:00:00Z/2017-01-02T00:00:00Z")
//!     .unwrap()
//!     .with_timezone(Some(Tz::UTC));
//! let second = Interval::parse("2017-01-02T00:00:00Z/2017-01-03T00:00:00Z")
//!     .unwrap()
//!     .with_timezone(Some(Tz::UTC));
//!
//! assert_eq!(first.format(false, &parent), "January 1, 2017");
//! assert_eq!(second.format(false, &parent), "January 2");
//! ```

use chrono::Datelike;

use crate::calendar::Moment;
use crate::interval::Interval;
use crate::locale::OrdinalKind;
use crate::period::Period;
use crate::render::render;
use crate::templates::{
    LocaleTemplateStore, TemplateCategory, ORDINAL_SEMESTER_PLACEHOLDER, SEMESTER_PLACEHOLDER,
};

/// How much context a label may drop.
#[derive(Debug, Clone, Copy, Default)]
pub enum Simplify<'a> {
    /// Always render the full label.
    #[default]
    Never,
    /// Always render the simplified label.
    Always,
    /// Simplify when the range is an inner member of this parent range.
    Within(&'a Interval),
}

impl From<bool> for Simplify<'_> {
    fn from(value: bool) -> Self {
        if value {
            Simplify::Always
        } else {
            Simplify::Never
        }
    }
}

impl<'a> From<&'a Interval> for Simplify<'a> {
    fn from(parent: &'a Interval) -> Self {
        Simplify::Within(parent)
    }
}

impl<'a> From<Option<&'a Interval>> for Simplify<'a> {
    fn from(parent: Option<&'a Interval>) -> Self {
        parent.map_or(Simplify::Never, Simplify::Within)
    }
}

/// Granularity whose start marks a range as "first of its kind".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pivot {
    Day,
    Year,
}

impl Pivot {
    fn is_start(self, moment: &Moment) -> bool {
        match self {
            Pivot::Day => moment.is_start_of_day(),
            Pivot::Year => moment.is_start_of_year(),
        }
    }
}

/// Renders intervals with the templates of a [`LocaleTemplateStore`].
#[derive(Debug, Clone, Copy)]
pub struct RangeFormatter<'s> {
    store: &'s LocaleTemplateStore,
}

impl Default for RangeFormatter<'static> {
    fn default() -> Self {
        Self::new(LocaleTemplateStore::builtin())
    }
}

impl<'s> RangeFormatter<'s> {
    pub fn new(store: &'s LocaleTemplateStore) -> Self {
        Self { store }
    }

    /// Render `interval` as a label in its active locale and timezone.
    ///
    /// Never fails: a range without a canonical period renders as
    /// `"<start> - <end>"` with the generic template.
    pub fn format<'a>(
        &self,
        interval: &Interval,
        short: bool,
        simplify: impl Into<Simplify<'a>>,
    ) -> String {
        let simplify = simplify.into();
        let Some(period) = interval.period() else {
            return self.format_generic(interval, short);
        };

        let (category, pivot) = match period {
            Period::Second => (TemplateCategory::DateTimeSecond, Pivot::Day),
            Period::Minute | Period::Hour => (TemplateCategory::DateTime, Pivot::Day),
            Period::Day => (TemplateCategory::Date, Pivot::Year),
            Period::Week => (TemplateCategory::Week, Pivot::Year),
            Period::IsoWeek => (TemplateCategory::IsoWeek, Pivot::Year),
            Period::Month => (TemplateCategory::Month, Pivot::Year),
            Period::Quarter => (TemplateCategory::Quarter, Pivot::Year),
            Period::Semester => return self.format_semester(interval, short, simplify),
            Period::Year => {
                let template = self.pick_template(interval, TemplateCategory::Year, short, false);
                return self.render_start(interval, template);
            }
        };

        let simplified = self.should_simplify(interval, simplify, pivot);
        let template = self.pick_template(interval, category, short, simplified);
        self.render_start(interval, template)
    }

    fn format_generic(&self, interval: &Interval, short: bool) -> String {
        let template = self.pick_template(interval, TemplateCategory::Generic, short, false);
        let locale = interval.calendar_locale();
        let (start, end) = interval.moments();
        format!(
            "{} - {}",
            render(template, &start.local(), locale),
            render(template, &end.local(), locale)
        )
    }

    fn format_semester(&self, interval: &Interval, short: bool, simplify: Simplify<'_>) -> String {
        let simplified = self.should_simplify(interval, simplify, Pivot::Year);
        let template = self.pick_template(interval, TemplateCategory::Semester, short, simplified);

        let (start, _) = interval.moments();
        let semester = if start.local().month0() < 6 { 1 } else { 2 };
        let ordinal = interval
            .calendar_locale()
            .ordinal(semester, OrdinalKind::Number);

        self.render_start(interval, template)
            .replace(ORDINAL_SEMESTER_PLACEHOLDER, &ordinal)
            .replace(SEMESTER_PLACEHOLDER, &semester.to_string())
    }

    fn should_simplify(&self, interval: &Interval, simplify: Simplify<'_>, pivot: Pivot) -> bool {
        match simplify {
            Simplify::Never => false,
            Simplify::Always => true,
            Simplify::Within(parent) => {
                let (start, _) = interval.moments();
                !pivot.is_start(&start) && interval.start() != parent.start()
            }
        }
    }

    fn pick_template(
        &self,
        interval: &Interval,
        category: TemplateCategory,
        short: bool,
        simplified: bool,
    ) -> &'s str {
        self.store
            .templates(interval.locale(), category)
            .pick(short, simplified)
    }

    fn render_start(&self, interval: &Interval, template: &str) -> String {
        let (start, _) = interval.moments();
        render(template, &start.local(), interval.calendar_locale())
    }
}
