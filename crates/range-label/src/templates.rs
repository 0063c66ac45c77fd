//! Per-locale label templates.
//!
//! Each locale maps a [`TemplateCategory`] to up to four templates:
//! `[short, long, short simplified, long simplified]`. Resolution of a locale tag
//! never fails: exact tag, then primary subtag, then the base locale (`en`),
//! whose entry covers every category.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RangeError;
use crate::locale::{normalize_tag, BASE_LOCALE};

/// Template used when a set holds no usable slot, short form.
pub const DEFAULT_SHORT_TEMPLATE: &str = "l LT";
/// Template used when a set holds no usable slot, long form.
pub const DEFAULT_LONG_TEMPLATE: &str = "LLLL";

/// Semester placeholders replaced after rendering.
pub const SEMESTER_PLACEHOLDER: &str = "__SEMESTER";
pub const ORDINAL_SEMESTER_PLACEHOLDER: &str = "__ORDINALSEMESTER";

/// Which template family a range is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateCategory {
    #[serde(rename = "generic")]
    Generic,
    #[serde(rename = "year")]
    Year,
    #[serde(rename = "semester")]
    Semester,
    #[serde(rename = "quarter")]
    Quarter,
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "week")]
    Week,
    #[serde(rename = "isoweek")]
    IsoWeek,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    #[serde(rename = "datetimeSecond")]
    DateTimeSecond,
}

impl TemplateCategory {
    pub const ALL: [TemplateCategory; 10] = [
        TemplateCategory::Generic,
        TemplateCategory::Year,
        TemplateCategory::Semester,
        TemplateCategory::Quarter,
        TemplateCategory::Month,
        TemplateCategory::Week,
        TemplateCategory::IsoWeek,
        TemplateCategory::Date,
        TemplateCategory::DateTime,
        TemplateCategory::DateTimeSecond,
    ];
}

/// The ordered template slots for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateSet {
    slots: Vec<String>,
}

impl TemplateSet {
    pub fn new<I, S>(slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slots: slots.into_iter().map(Into::into).collect(),
        }
    }

    fn slot(&self, index: usize) -> Option<&str> {
        self.slots
            .get(index)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Pick a template. A missing simplified slot falls back to the full slot of
    /// the same length, a missing full slot to the hard default.
    pub fn pick(&self, short: bool, simplified: bool) -> &str {
        let full_index = if short { 0 } else { 1 };
        let default = if short {
            DEFAULT_SHORT_TEMPLATE
        } else {
            DEFAULT_LONG_TEMPLATE
        };
        let full = self.slot(full_index);
        let chosen = if simplified {
            self.slot(full_index + 2).or(full)
        } else {
            full
        };
        chosen.unwrap_or(default)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(String::is_empty)
    }
}

/// Templates for every category of one locale.
pub type LocaleTemplates = HashMap<TemplateCategory, TemplateSet>;

/// Locale tag → category → templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleTemplateStore {
    locales: HashMap<String, LocaleTemplates>,
}

impl LocaleTemplateStore {
    /// The bundled `en` and `fr` templates.
    pub fn builtin() -> &'static LocaleTemplateStore {
        static STORE: OnceLock<LocaleTemplateStore> = OnceLock::new();
        STORE.get_or_init(|| {
            let mut locales = HashMap::new();
            locales.insert("en".to_string(), english());
            locales.insert("fr".to_string(), french());
            LocaleTemplateStore { locales }
        })
    }

    /// A store holding the bundled locales plus the ones described by `json`.
    ///
    /// The document maps locale tags to category names to template arrays:
    /// `{"de": {"month": ["MMM YY", "MMMM YYYY", "MMM", "MMMM"]}}`. Entries for an
    /// already known tag replace its categories one by one.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::InvalidTemplates`] if the document does not have that
    /// shape.
    pub fn from_json(json: &str) -> Result<Self, RangeError> {
        let parsed: HashMap<String, LocaleTemplates> =
            serde_json::from_str(json).map_err(|e| RangeError::InvalidTemplates(e.to_string()))?;

        let mut store = Self::builtin().clone();
        for (tag, templates) in parsed {
            store.insert(&tag, templates);
        }
        Ok(store)
    }

    /// Add or extend a locale entry.
    pub fn insert(&mut self, tag: &str, templates: LocaleTemplates) {
        self.locales
            .entry(normalize_tag(tag))
            .or_default()
            .extend(templates);
    }

    /// Whether `tag` or its primary subtag has an entry of its own, without
    /// falling back to the base locale.
    pub fn resolves(&self, tag: &str) -> bool {
        let normalized = normalize_tag(tag);
        let primary = normalized.split('-').next().unwrap_or_default();
        self.locales.contains_key(&normalized) || self.locales.contains_key(primary)
    }

    /// Resolve the template entry for a locale tag.
    pub fn lookup(&self, tag: &str) -> &LocaleTemplates {
        let normalized = normalize_tag(tag);
        if let Some(templates) = self.locales.get(&normalized) {
            return templates;
        }

        let primary = normalized.split('-').next().unwrap_or_default();
        if let Some(templates) = self.locales.get(primary) {
            debug!(locale = tag, fallback = primary, "Resolved templates by primary subtag");
            return templates;
        }

        debug!(locale = tag, fallback = BASE_LOCALE, "Falling back to base locale templates");
        self.base()
    }

    /// Templates of `category` for a locale tag. A category the resolved locale
    /// lacks is taken from the base locale.
    pub fn templates(&self, tag: &str, category: TemplateCategory) -> &TemplateSet {
        static EMPTY: TemplateSet = TemplateSet { slots: Vec::new() };
        self.lookup(tag)
            .get(&category)
            .filter(|set| !set.is_empty())
            .or_else(|| self.base().get(&category))
            .unwrap_or(&EMPTY)
    }

    fn base(&self) -> &LocaleTemplates {
        static EMPTY: OnceLock<LocaleTemplates> = OnceLock::new();
        self.locales
            .get(BASE_LOCALE)
            .unwrap_or_else(|| EMPTY.get_or_init(HashMap::new))
    }
}

impl Default for LocaleTemplateStore {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn entry(pairs: &[(TemplateCategory, &[&str])]) -> LocaleTemplates {
    pairs
        .iter()
        .map(|(category, slots)| (*category, TemplateSet::new(slots.iter().copied())))
        .collect()
}

fn english() -> LocaleTemplates {
    use TemplateCategory::*;
    entry(&[
        (Generic, &["l LT", "LLLL"]),
        (Year, &["YY", "YYYY"]),
        (
            Semester,
            &[
                "[S][__SEMESTER] YY",
                "[__ORDINALSEMESTER] [semester] YYYY",
                "[S][__SEMESTER]",
                "[__ORDINALSEMESTER] [semester]",
            ],
        ),
        (
            Quarter,
            &["[Q]Q YYYY", "Qo [quarter] YYYY", "[Q]Q", "Qo [quarter]"],
        ),
        (Month, &["MMM YY", "MMMM YYYY", "MMM", "MMMM"]),
        (
            Week,
            &["[W]ww YY", "[Week] #ww (L)", "[W]ww", "[Week] #ww (MM/DD)"],
        ),
        (
            IsoWeek,
            &["[W]WW YY", "[Week] #WW (L)", "[W]WW", "[Week] #WW (MM/DD)"],
        ),
        (Date, &["L", "LL", "MM/DD", "MMMM D"]),
        (DateTime, &["L LT", "LL LT", "LT", "LT"]),
        (DateTimeSecond, &["L LTS", "LL LTS", "LTS", "LTS"]),
    ])
}

fn french() -> LocaleTemplates {
    use TemplateCategory::*;
    entry(&[
        (Generic, &["l LT", "LLLL"]),
        (Year, &["YY", "YYYY"]),
        (
            Semester,
            &[
                "[S][__SEMESTER] YY",
                "[__ORDINALSEMESTER] [semestre] YYYY",
                "[S][__SEMESTER]",
                "[__ORDINALSEMESTER] [semestre]",
            ],
        ),
        (
            Quarter,
            &["[T]Q YYYY", "Qo [trimestre] YYYY", "[T]Q", "Qo [trimestre]"],
        ),
        (Month, &["MMM YY", "MMMM YYYY", "MMM", "MMMM"]),
        (
            Week,
            &["[S]ww YY", "[Semaine] n°ww (L)", "[S]ww", "[Semaine] n°ww (DD/MM)"],
        ),
        (
            IsoWeek,
            &["[S]WW YY", "[Semaine] n°WW (L)", "[S]WW", "[Semaine] n°WW (DD/MM)"],
        ),
        (Date, &["L", "LL", "DD/MM", "D MMMM"]),
        (DateTime, &["L LT", "LL LT", "LT", "LT"]),
        (DateTimeSecond, &["L LTS", "LL LTS", "LTS", "LTS"]),
    ])
}
