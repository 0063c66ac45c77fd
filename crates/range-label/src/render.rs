//! Token template rendering.
//!
//! Templates use the moment-style token vocabulary (`YYYY`, `MMMM`, `Qo`, `LL`,
//! ...). Text inside `[brackets]` is copied verbatim and `\x` escapes a single
//! character. Long-date macros (`LT`, `LTS`, `L`..`LLLL`, `l`..`llll`) are
//! expanded through the locale before the remaining tokens are rendered.
//!
//! Rendering works on wall-clock time: the caller has already chosen the zone.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};

use crate::locale::{CalendarLocale, OrdinalKind, WeekRule};

const LONG_TOKENS: &[&str] = &[
    "LTS", "LT", "LLLL", "LLL", "LL", "L", "llll", "lll", "ll", "l",
];

/// Longest tokens first, so `MMMM` wins over `MM` and `M`.
const TOKENS: &[&str] = &[
    "YYYY", "GGGG", "gggg", "MMMM", "dddd", "DDDD", "DDDo", "SSS", "MMM", "ddd", "DDD", "YY",
    "Qo", "Mo", "MM", "Do", "DD", "do", "dd", "wo", "ww", "Wo", "WW", "HH", "hh", "kk", "mm",
    "ss", "SS", "Q", "M", "D", "d", "e", "E", "w", "W", "H", "h", "k", "m", "s", "S", "A", "a",
];

/// Long-date macros can refer to each other; bound the number of passes.
const MAX_EXPANSIONS: usize = 5;

/// Render `template` for the wall-clock time `local` in `locale`.
pub fn render(template: &str, local: &NaiveDateTime, locale: &CalendarLocale) -> String {
    let expanded = expand_long_formats(template, locale);
    let mut out = String::with_capacity(expanded.len() + 16);
    let mut rest = expanded.as_str();

    while let Some(c) = rest.chars().next() {
        if let Some((literal, tail)) = split_bracketed(rest) {
            out.push_str(literal);
            rest = tail;
            continue;
        }
        if c == '\\' {
            let mut chars = rest[1..].chars();
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
            rest = chars.as_str();
            continue;
        }
        if let Some(token) = TOKENS.iter().find(|t| rest.starts_with(**t)) {
            out.push_str(&render_token(token, local, locale));
            rest = &rest[token.len()..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// `[literal]` at the head of `s`: returns the inner text and the remainder.
fn split_bracketed(s: &str) -> Option<(&str, &str)> {
    let inner = s.strip_prefix('[')?;
    let close = inner.find(']')?;
    if inner[..close].contains('[') {
        return None;
    }
    Some((&inner[..close], &inner[close + 1..]))
}

fn expand_long_formats(template: &str, locale: &CalendarLocale) -> String {
    let mut current = template.to_string();
    for _ in 0..MAX_EXPANSIONS {
        let expanded = expand_once(&current, locale);
        if expanded == current {
            break;
        }
        current = expanded;
    }
    current
}

fn expand_once(template: &str, locale: &CalendarLocale) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        if let Some(close) = split_bracketed(rest).map(|(literal, _)| literal.len() + 2) {
            out.push_str(&rest[..close]);
            rest = &rest[close..];
            continue;
        }
        if c == '\\' {
            let escaped_len = rest[1..].chars().next().map_or(0, char::len_utf8);
            out.push_str(&rest[..1 + escaped_len]);
            rest = &rest[1 + escaped_len..];
            continue;
        }
        if let Some(token) = LONG_TOKENS.iter().find(|t| rest.starts_with(**t)) {
            out.push_str(&long_format(token, locale));
            rest = &rest[token.len()..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

fn long_format(token: &str, locale: &CalendarLocale) -> String {
    let formats = locale.formats();
    match token {
        "LT" => formats.lt.to_string(),
        "LTS" => formats.lts.to_string(),
        "L" => formats.l.to_string(),
        "LL" => formats.ll.to_string(),
        "LLL" => formats.lll.to_string(),
        "LLLL" => formats.llll.to_string(),
        "l" => abbreviate(formats.l),
        "ll" => abbreviate(formats.ll),
        "lll" => abbreviate(formats.lll),
        "llll" => abbreviate(formats.llll),
        other => other.to_string(),
    }
}

/// Derive the compact `l*` forms: `MMMM`→`MMM`, `MM`→`M`, `DD`→`D`, `dddd`→`ddd`.
fn abbreviate(format: &str) -> String {
    let mut out = String::with_capacity(format.len());
    let mut rest = format;
    while let Some(c) = rest.chars().next() {
        let replaced = ["MMMM", "MM", "DD", "dddd"]
            .iter()
            .find(|pattern| rest.starts_with(**pattern));
        match replaced {
            Some(pattern) => {
                out.push_str(&pattern[1..]);
                rest = &rest[pattern.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

fn render_token(token: &str, local: &NaiveDateTime, locale: &CalendarLocale) -> String {
    let month0 = local.month0();
    let quarter = month0 / 3 + 1;
    let weekday = local.weekday();
    let hour = local.hour();

    match token {
        "YYYY" => format!("{:04}", local.year()),
        "YY" => format!("{:02}", local.year().rem_euclid(100)),
        "Q" => quarter.to_string(),
        "Qo" => locale.ordinal(quarter, OrdinalKind::Quarter),
        "M" => local.month().to_string(),
        "MM" => format!("{:02}", local.month()),
        "Mo" => locale.ordinal(local.month(), OrdinalKind::Month),
        "MMM" => locale.month_short(month0).to_string(),
        "MMMM" => locale.month_name(month0).to_string(),
        "D" => local.day().to_string(),
        "DD" => format!("{:02}", local.day()),
        "Do" => locale.ordinal(local.day(), OrdinalKind::DayOfMonth),
        "DDD" => local.ordinal().to_string(),
        "DDDD" => format!("{:03}", local.ordinal()),
        "DDDo" => locale.ordinal(local.ordinal(), OrdinalKind::DayOfYear),
        "d" => weekday.num_days_from_sunday().to_string(),
        "do" => locale.ordinal(weekday.num_days_from_sunday(), OrdinalKind::Weekday),
        "dd" => locale.weekday_min(weekday).to_string(),
        "ddd" => locale.weekday_short(weekday).to_string(),
        "dddd" => locale.weekday_name(weekday).to_string(),
        "e" => locale_weekday(weekday, locale.week_rule()).to_string(),
        "E" => weekday.number_from_monday().to_string(),
        "w" => locale_week(local.date(), locale.week_rule()).0.to_string(),
        "ww" => format!("{:02}", locale_week(local.date(), locale.week_rule()).0),
        "wo" => locale.ordinal(locale_week(local.date(), locale.week_rule()).0, OrdinalKind::Week),
        "W" => local.iso_week().week().to_string(),
        "WW" => format!("{:02}", local.iso_week().week()),
        "Wo" => locale.ordinal(local.iso_week().week(), OrdinalKind::Week),
        "gggg" => format!("{:04}", locale_week(local.date(), locale.week_rule()).1),
        "GGGG" => format!("{:04}", local.iso_week().year()),
        "H" => hour.to_string(),
        "HH" => format!("{hour:02}"),
        "h" => twelve_hour(hour).to_string(),
        "hh" => format!("{:02}", twelve_hour(hour)),
        "k" => (if hour == 0 { 24 } else { hour }).to_string(),
        "kk" => format!("{:02}", if hour == 0 { 24 } else { hour }),
        "m" => local.minute().to_string(),
        "mm" => format!("{:02}", local.minute()),
        "s" => local.second().to_string(),
        "ss" => format!("{:02}", local.second()),
        "S" => (local.nanosecond() / 100_000_000 % 10).to_string(),
        "SS" => format!("{:02}", local.nanosecond() / 10_000_000 % 100),
        "SSS" => format!("{:03}", local.nanosecond() / 1_000_000 % 1_000),
        "A" => locale.meridiem(hour, false).to_string(),
        "a" => locale.meridiem(hour, true).to_string(),
        other => other.to_string(),
    }
}

fn twelve_hour(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

/// 0-based weekday counted from the locale's first day of the week.
pub fn locale_weekday(weekday: Weekday, rule: WeekRule) -> u32 {
    (weekday.num_days_from_sunday() + 7 - rule.dow()) % 7
}

/// Locale week number and week-based year.
///
/// Week 1 is the week (starting on `rule.first_day`) that contains January
/// `7 + dow - doy`.
pub fn locale_week(date: NaiveDate, rule: WeekRule) -> (u32, i32) {
    let year = date.year();
    let offset = first_week_offset(year, rule);
    let week = (date.ordinal() as i32 - offset - 1).div_euclid(7) + 1;

    if week < 1 {
        let previous = year - 1;
        ((week + weeks_in_year(previous, rule)) as u32, previous)
    } else if week > weeks_in_year(year, rule) {
        ((week - weeks_in_year(year, rule)) as u32, year + 1)
    } else {
        (week as u32, year)
    }
}

fn first_week_offset(year: i32, rule: WeekRule) -> i32 {
    let dow = rule.dow() as i32;
    let anchor_day = 7 + dow - rule.doy as i32;
    let anchor_weekday = NaiveDate::from_ymd_opt(year, 1, anchor_day.clamp(1, 31) as u32)
        .map_or(0, |d| d.weekday().num_days_from_sunday() as i32);
    let shift = (7 + anchor_weekday - dow) % 7;
    -shift + anchor_day - 1
}

fn weeks_in_year(year: i32, rule: WeekRule) -> i32 {
    let days = if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    };
    (days - first_week_offset(year, rule) + first_week_offset(year + 1, rule)) / 7
}
