//! Calendar locale data: names, long-date formats, ordinals and week rules.
//!
//! This is what the renderer needs to turn tokens such as `MMMM`, `Qo` or `LL`
//! into text for a given language. The label templates themselves live in
//! [`crate::templates`]; a locale can have calendar data without having its own
//! templates (it then renders the base templates with its own names).

use chrono::Weekday;

/// The base locale every lookup falls back to.
pub const BASE_LOCALE: &str = "en";

/// Which token an ordinal is produced for. Some languages inflect differently
/// for days, months or weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdinalKind {
    /// No specific token (plain number, e.g. a semester index).
    Number,
    Month,
    Quarter,
    DayOfMonth,
    DayOfYear,
    Weekday,
    Week,
}

/// Long-date format macros, expressed in regular tokens.
#[derive(Debug, Clone, Copy)]
pub struct LongDateFormats {
    pub lt: &'static str,
    pub lts: &'static str,
    pub l: &'static str,
    pub ll: &'static str,
    pub lll: &'static str,
    pub llll: &'static str,
}

/// Locale week numbering rule: the first day of the week and the January day
/// that always falls into week 1 (expressed as `7 + dow - doy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRule {
    pub first_day: Weekday,
    pub doy: u32,
}

impl WeekRule {
    /// `first_day` as a 0-based index where Sunday is 0.
    pub fn dow(&self) -> u32 {
        self.first_day.num_days_from_sunday()
    }
}

/// Calendar data for one language.
#[derive(Debug)]
pub struct CalendarLocale {
    pub tag: &'static str,
    months: [&'static str; 12],
    months_short: [&'static str; 12],
    /// Sunday first.
    weekdays: [&'static str; 7],
    weekdays_short: [&'static str; 7],
    weekdays_min: [&'static str; 7],
    formats: LongDateFormats,
    week: WeekRule,
    ordinal: fn(u32, OrdinalKind) -> String,
}

impl CalendarLocale {
    /// Resolve a locale tag: exact match, then primary subtag. Tags are compared
    /// case-insensitively and `_` is accepted as a subtag separator.
    pub fn resolve(tag: &str) -> Option<&'static CalendarLocale> {
        let normalized = normalize_tag(tag);
        let primary = normalized.split('-').next().unwrap_or_default();
        LOCALES
            .iter()
            .copied()
            .find(|locale| locale.tag == normalized)
            .or_else(|| LOCALES.iter().copied().find(|locale| locale.tag == primary))
    }

    /// The base locale.
    pub fn base() -> &'static CalendarLocale {
        &EN
    }

    pub fn month_name(&self, month0: u32) -> &'static str {
        self.months[month0 as usize % 12]
    }

    pub fn month_short(&self, month0: u32) -> &'static str {
        self.months_short[month0 as usize % 12]
    }

    pub fn weekday_name(&self, weekday: Weekday) -> &'static str {
        self.weekdays[weekday.num_days_from_sunday() as usize]
    }

    pub fn weekday_short(&self, weekday: Weekday) -> &'static str {
        self.weekdays_short[weekday.num_days_from_sunday() as usize]
    }

    pub fn weekday_min(&self, weekday: Weekday) -> &'static str {
        self.weekdays_min[weekday.num_days_from_sunday() as usize]
    }

    pub fn formats(&self) -> &LongDateFormats {
        &self.formats
    }

    pub fn week_rule(&self) -> WeekRule {
        self.week
    }

    /// The locale's first day of the week.
    pub fn first_weekday(&self) -> Weekday {
        self.week.first_day
    }

    pub fn ordinal(&self, n: u32, kind: OrdinalKind) -> String {
        (self.ordinal)(n, kind)
    }

    /// Meridiem marker. Every bundled locale uses the plain AM/PM form.
    pub fn meridiem(&self, hour: u32, lowercase: bool) -> &'static str {
        match (hour < 12, lowercase) {
            (true, false) => "AM",
            (true, true) => "am",
            (false, false) => "PM",
            (false, true) => "pm",
        }
    }
}

/// Lowercase a tag and use `-` as the subtag separator.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

/// Parse a POSIX locale string such as `fr_FR.UTF-8` into a tag (`fr-fr`).
pub fn tag_from_posix(value: &str) -> Option<String> {
    let lang_country = value.split(['.', '@']).next()?;
    if lang_country.is_empty() || lang_country == "C" || lang_country == "POSIX" {
        return None;
    }
    Some(normalize_tag(lang_country))
}

// ── Ordinals ────────────────────────────────────────────────────────────────

fn ordinal_en(n: u32, _kind: OrdinalKind) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

fn ordinal_fr(n: u32, kind: OrdinalKind) -> String {
    match kind {
        OrdinalKind::DayOfMonth => {
            if n == 1 {
                format!("{n}er")
            } else {
                n.to_string()
            }
        }
        OrdinalKind::Week => format!("{n}{}", if n == 1 { "re" } else { "e" }),
        _ => format!("{n}{}", if n == 1 { "er" } else { "e" }),
    }
}

fn ordinal_es(n: u32, _kind: OrdinalKind) -> String {
    format!("{n}º")
}

fn ordinal_de(n: u32, _kind: OrdinalKind) -> String {
    format!("{n}.")
}

// ── Bundled locales ─────────────────────────────────────────────────────────

static LOCALES: &[&CalendarLocale] = &[&EN, &FR, &ES, &DE];

static EN: CalendarLocale = CalendarLocale {
    tag: "en",
    months: [
        "January", "February", "March", "April", "May", "June", "July", "August",
        "September", "October", "November", "December",
    ],
    months_short: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    weekdays: [
        "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
    ],
    weekdays_short: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
    weekdays_min: ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"],
    formats: LongDateFormats {
        lt: "h:mm A",
        lts: "h:mm:ss A",
        l: "MM/DD/YYYY",
        ll: "MMMM D, YYYY",
        lll: "MMMM D, YYYY h:mm A",
        llll: "dddd, MMMM D, YYYY h:mm A",
    },
    week: WeekRule {
        first_day: Weekday::Sun,
        doy: 6,
    },
    ordinal: ordinal_en,
};

static FR: CalendarLocale = CalendarLocale {
    tag: "fr",
    months: [
        "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août",
        "septembre", "octobre", "novembre", "décembre",
    ],
    months_short: [
        "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.",
        "nov.", "déc.",
    ],
    weekdays: [
        "dimanche", "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi",
    ],
    weekdays_short: ["dim.", "lun.", "mar.", "mer.", "jeu.", "ven.", "sam."],
    weekdays_min: ["di", "lu", "ma", "me", "je", "ve", "sa"],
    formats: LongDateFormats {
        lt: "HH:mm",
        lts: "HH:mm:ss",
        l: "DD/MM/YYYY",
        ll: "D MMMM YYYY",
        lll: "D MMMM YYYY HH:mm",
        llll: "dddd D MMMM YYYY HH:mm",
    },
    week: WeekRule {
        first_day: Weekday::Mon,
        doy: 4,
    },
    ordinal: ordinal_fr,
};

static ES: CalendarLocale = CalendarLocale {
    tag: "es",
    months: [
        "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto",
        "septiembre", "octubre", "noviembre", "diciembre",
    ],
    months_short: [
        "ene.", "feb.", "mar.", "abr.", "may.", "jun.", "jul.", "ago.", "sep.", "oct.",
        "nov.", "dic.",
    ],
    weekdays: [
        "domingo", "lunes", "martes", "miércoles", "jueves", "viernes", "sábado",
    ],
    weekdays_short: ["dom.", "lun.", "mar.", "mié.", "jue.", "vie.", "sáb."],
    weekdays_min: ["do", "lu", "ma", "mi", "ju", "vi", "sá"],
    formats: LongDateFormats {
        lt: "H:mm",
        lts: "H:mm:ss",
        l: "DD/MM/YYYY",
        ll: "D [de] MMMM [de] YYYY",
        lll: "D [de] MMMM [de] YYYY H:mm",
        llll: "dddd, D [de] MMMM [de] YYYY H:mm",
    },
    week: WeekRule {
        first_day: Weekday::Mon,
        doy: 4,
    },
    ordinal: ordinal_es,
};

static DE: CalendarLocale = CalendarLocale {
    tag: "de",
    months: [
        "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August",
        "September", "Oktober", "November", "Dezember",
    ],
    months_short: [
        "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sep.", "Okt.",
        "Nov.", "Dez.",
    ],
    weekdays: [
        "Sonntag", "Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag", "Samstag",
    ],
    weekdays_short: ["So.", "Mo.", "Di.", "Mi.", "Do.", "Fr.", "Sa."],
    weekdays_min: ["So", "Mo", "Di", "Mi", "Do", "Fr", "Sa"],
    formats: LongDateFormats {
        lt: "HH:mm",
        lts: "HH:mm:ss",
        l: "DD.MM.YYYY",
        ll: "D. MMMM YYYY",
        lll: "D. MMMM YYYY HH:mm",
        llll: "dddd, D. MMMM YYYY HH:mm",
    },
    week: WeekRule {
        first_day: Weekday::Mon,
        doy: 4,
    },
    ordinal: ordinal_de,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_exact_and_primary_subtag() {
        assert_eq!(CalendarLocale::resolve("fr").unwrap().tag, "fr");
        assert_eq!(CalendarLocale::resolve("fr-CA").unwrap().tag, "fr");
        assert_eq!(CalendarLocale::resolve("en_US").unwrap().tag, "en");
        assert_eq!(CalendarLocale::resolve("DE").unwrap().tag, "de");
    }

    #[test]
    fn test_resolve_unknown_tag() {
        assert!(CalendarLocale::resolve("tq").is_none());
        assert!(CalendarLocale::resolve("").is_none());
    }

    #[test]
    fn test_english_ordinals() {
        let en = CalendarLocale::base();
        let rendered: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 101, 111]
            .into_iter()
            .map(|n| en.ordinal(n, OrdinalKind::Number))
            .collect();
        assert_eq!(
            rendered,
            ["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "101st", "111th"]
        );
    }

    #[test]
    fn test_french_ordinals_depend_on_kind() {
        let fr = CalendarLocale::resolve("fr").unwrap();
        assert_eq!(fr.ordinal(1, OrdinalKind::Quarter), "1er");
        assert_eq!(fr.ordinal(2, OrdinalKind::Quarter), "2e");
        assert_eq!(fr.ordinal(1, OrdinalKind::DayOfMonth), "1er");
        assert_eq!(fr.ordinal(2, OrdinalKind::DayOfMonth), "2");
        assert_eq!(fr.ordinal(1, OrdinalKind::Week), "1re");
    }

    #[test]
    fn test_first_weekday() {
        assert_eq!(CalendarLocale::base().first_weekday(), Weekday::Sun);
        assert_eq!(CalendarLocale::resolve("fr").unwrap().first_weekday(), Weekday::Mon);
        assert_eq!(CalendarLocale::base().week_rule().dow(), 0);
    }

    #[test]
    fn test_tag_from_posix() {
        assert_eq!(tag_from_posix("fr_FR.UTF-8").as_deref(), Some("fr-fr"));
        assert_eq!(tag_from_posix("en_US").as_deref(), Some("en-us"));
        assert_eq!(tag_from_posix("C.UTF-8"), None);
        assert_eq!(tag_from_posix(""), None);
    }
}
