//! # range-label
//!
//! Human labels for date-time ranges.
//!
//! Given a range such as `2017-01-01T00:00:00Z/2017-02-01T00:00:00Z`, the crate
//! recognizes the canonical period it covers (here a month) in a given timezone
//! and renders it as a locale-aware label ("January 2017", "Jan 17"). Labels can
//! be simplified against a parent range so that the months of a year read
//! "Jan 17", "Feb", "Mar" under a "2017" heading.
//!
//! ## Modules
//!
//! - [`interval`] — The `Interval` value: parsing, locale/timezone switching, durations
//! - [`period`] — Canonical periods and the classifier
//! - [`format`] — Period-aware label rendering with optional simplification
//! - [`templates`] — Per-locale label templates and their fallback chain
//! - [`render`] — Token template renderer (`MMMM YYYY`, `[Week] #ww`, `LL`, ...)
//! - [`locale`] — Calendar locale data: names, long-date formats, ordinals, week rules
//! - [`calendar`] — Zoned views of timestamps, calendar arithmetic, strict ISO-8601 parsing
//! - [`cast`] — Lenient casting of JSON values into ranges and datetimes
//! - [`config`] — Construction defaults (locale, timezone)
//! - [`error`] — Error types

pub mod calendar;
pub mod cast;
pub mod config;
pub mod error;
pub mod format;
pub mod interval;
pub mod locale;
pub mod period;
pub mod render;
pub mod templates;

pub use calendar::TimeUnit;
pub use cast::{
    cast_datetime, cast_datetime_or_leave_as_is, cast_range, cast_range_or_leave_as_is, Castable,
};
pub use config::IntervalOptions;
pub use error::RangeError;
pub use format::{RangeFormatter, Simplify};
pub use interval::Interval;
pub use locale::CalendarLocale;
pub use period::Period;
pub use templates::{LocaleTemplateStore, TemplateCategory, TemplateSet};
