//! Construction defaults for [`Interval`](crate::Interval).
//!
//! An interval snapshots its default locale and timezone once, when it is built.
//! Changing the process environment afterwards has no effect on it.

use std::env;

use chrono_tz::Tz;
use tracing::debug;

use crate::locale::{normalize_tag, tag_from_posix, BASE_LOCALE};

/// Locale and timezone an interval starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalOptions {
    /// BCP-47-like tag; also what `with_locale(None)` restores.
    pub locale: String,
    /// `None` means floating time: endpoints are read at their own offsets.
    pub timezone: Option<Tz>,
}

impl Default for IntervalOptions {
    fn default() -> Self {
        Self {
            locale: BASE_LOCALE.to_string(),
            timezone: None,
        }
    }
}

impl IntervalOptions {
    pub fn new(locale: &str, timezone: Option<Tz>) -> Self {
        Self {
            locale: normalize_tag(locale),
            timezone,
        }
    }

    /// Read the host defaults.
    ///
    /// The locale comes from `LC_ALL`, `LC_TIME` or `LANG` (first set wins, POSIX
    /// form such as `fr_FR.UTF-8`), falling back to `en`. The timezone comes from
    /// the operating system, falling back to UTC.
    pub fn from_system() -> Self {
        let locale = ["LC_ALL", "LC_TIME", "LANG"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find_map(|value| tag_from_posix(&value))
            .unwrap_or_else(|| BASE_LOCALE.to_string());

        Self {
            locale,
            timezone: Some(system_timezone()),
        }
    }
}

/// The host's IANA timezone, or UTC when it cannot be determined.
pub fn system_timezone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            debug!(timezone = %name, "Unknown system timezone, using UTC");
            Tz::UTC
        }),
        Err(e) => {
            debug!(error = %e, "Cannot read system timezone, using UTC");
            Tz::UTC
        }
    }
}
