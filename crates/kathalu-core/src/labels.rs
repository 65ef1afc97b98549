//! Bilingual label resolution.
//!
//! Labels are plain data: a table keyed by `(language, domain)` and then by
//! key. Lookups never fail. A missing key (or an empty value) resolves to the
//! key itself, so callers can always render something.
//!
//! Built-in Telugu and English tables ship with the crate; applications may
//! layer overrides on top with [`LabelTable::insert`].
//!
//! # Domains
//!
//! | Domain | Keys | Used for |
//! |--------|------|----------|
//! | `category` | category and length-bucket keys | tags on story cards |
//! | `category_filter` | category keys | options of the category filter |
//! | `ui` | `words`, `readMore`, `loadMore`, ... | fixed interface strings |

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::models::{Category, Language, LengthBucket, ParseTagError};

/// Placeholder substituted by [`fill_count`].
pub const COUNT_PLACEHOLDER: &str = "{count}";

/// UI keys used by the catalog views.
pub mod ui {
    pub const WORDS: &str = "words";
    pub const READ_MORE: &str = "readMore";
    pub const LOAD_MORE: &str = "loadMore";
    pub const LOAD_MORE_DEFAULT: &str = "loadMoreDefault";
    pub const STORY_LOADING: &str = "storyLoading";
    pub const STORY_ERROR: &str = "storyError";
    pub const STORY_EMPTY: &str = "storyEmpty";
    pub const CATALOG_ERROR: &str = "catalogError";
    pub const NO_RESULTS: &str = "noResults";
    pub const PAGE_TITLE: &str = "pageTitle";
}

/// Which family of labels a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelDomain {
    CategoryName,
    CategoryFilterName,
    UiString,
}

impl LabelDomain {
    pub const ALL: [LabelDomain; 3] = [
        LabelDomain::CategoryName,
        LabelDomain::CategoryFilterName,
        LabelDomain::UiString,
    ];

    pub fn key(self) -> &'static str {
        match self {
            LabelDomain::CategoryName => "category",
            LabelDomain::CategoryFilterName => "category_filter",
            LabelDomain::UiString => "ui",
        }
    }
}

impl fmt::Display for LabelDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for LabelDomain {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "category" | "categories" | "category_name" => Ok(LabelDomain::CategoryName),
            "category_filter" | "categoryFilters" | "category_filter_name" => {
                Ok(LabelDomain::CategoryFilterName)
            }
            "ui" | "ui_string" => Ok(LabelDomain::UiString),
            _ => Err(ParseTagError {
                kind: "label domain",
                value: s.to_string(),
            }),
        }
    }
}

type Entry = (Language, LabelDomain, &'static str, &'static str);

const BUILTIN: &[Entry] = &[
    (Language::Te, LabelDomain::CategoryName, "family", "కుటుంబం"),
    (Language::Te, LabelDomain::CategoryName, "travel", "ప్రయాణం"),
    (Language::Te, LabelDomain::CategoryName, "kids", "పిల్లలు"),
    (Language::Te, LabelDomain::CategoryName, "spiritual", "ఆధ్యాత్మిక"),
    (Language::Te, LabelDomain::CategoryName, "philosophical", "తత్వం"),
    (Language::Te, LabelDomain::CategoryName, "general", "సాధారణ"),
    (Language::Te, LabelDomain::CategoryName, "short", "చిన్న"),
    (Language::Te, LabelDomain::CategoryName, "long", "పెద్ద"),
    (Language::En, LabelDomain::CategoryName, "family", "Family"),
    (Language::En, LabelDomain::CategoryName, "travel", "Travel"),
    (Language::En, LabelDomain::CategoryName, "kids", "Kids"),
    (Language::En, LabelDomain::CategoryName, "spiritual", "Spiritual"),
    (Language::En, LabelDomain::CategoryName, "philosophical", "Philosophy"),
    (Language::En, LabelDomain::CategoryName, "general", "General"),
    (Language::En, LabelDomain::CategoryName, "short", "Short"),
    (Language::En, LabelDomain::CategoryName, "long", "Long"),
    (Language::Te, LabelDomain::CategoryFilterName, "family", "కుటుంబ కధలు"),
    (Language::Te, LabelDomain::CategoryFilterName, "travel", "ప్రయాణ వృత్తాంతాలు"),
    (Language::Te, LabelDomain::CategoryFilterName, "kids", "పిల్లల కధలు"),
    (Language::Te, LabelDomain::CategoryFilterName, "spiritual", "ఆధ్యాత్మిక కధలు"),
    (Language::Te, LabelDomain::CategoryFilterName, "philosophical", "తత్వ చర్చలు"),
    (Language::Te, LabelDomain::CategoryFilterName, "general", "సాధారణ కధలు"),
    (Language::En, LabelDomain::CategoryFilterName, "family", "Family Stories"),
    (Language::En, LabelDomain::CategoryFilterName, "travel", "Travel Stories"),
    (Language::En, LabelDomain::CategoryFilterName, "kids", "Children Stories"),
    (Language::En, LabelDomain::CategoryFilterName, "spiritual", "Spiritual Stories"),
    (Language::En, LabelDomain::CategoryFilterName, "philosophical", "Philosophical Stories"),
    (Language::En, LabelDomain::CategoryFilterName, "general", "General Stories"),
    (Language::Te, LabelDomain::UiString, ui::WORDS, "పదాలు"),
    (Language::Te, LabelDomain::UiString, ui::READ_MORE, "ఇక కథ లోకి"),
    (Language::Te, LabelDomain::UiString, ui::LOAD_MORE, "మరిన్ని కథలు లోడ్ చేయండి ({count})"),
    (Language::Te, LabelDomain::UiString, ui::LOAD_MORE_DEFAULT, "మరిన్ని కథలు లోడ్ చేయండి"),
    (Language::Te, LabelDomain::UiString, ui::STORY_LOADING, "కథ లోడ్ చేస్తున్నాం..."),
    (Language::Te, LabelDomain::UiString, ui::STORY_ERROR, "కథ లోడ్ చేయడంలో లోపం"),
    (Language::Te, LabelDomain::UiString, ui::STORY_EMPTY, "కథ కంటెంట్ లోడ్ చేయలేకపోయాము."),
    (Language::Te, LabelDomain::UiString, ui::CATALOG_ERROR, "కథలు లోడ్ చేయడంలో లోపం జరిగింది"),
    (Language::Te, LabelDomain::UiString, ui::NO_RESULTS, "కథలు కనుగొనబడలేదు"),
    (Language::Te, LabelDomain::UiString, ui::PAGE_TITLE, "రవి కావూరు కథలు - Telugu Stories Collection"),
    (Language::En, LabelDomain::UiString, ui::WORDS, "words"),
    (Language::En, LabelDomain::UiString, ui::READ_MORE, "Read More"),
    (Language::En, LabelDomain::UiString, ui::LOAD_MORE, "Load More Stories ({count})"),
    (Language::En, LabelDomain::UiString, ui::LOAD_MORE_DEFAULT, "Load More Stories"),
    (Language::En, LabelDomain::UiString, ui::STORY_LOADING, "Loading story..."),
    (Language::En, LabelDomain::UiString, ui::STORY_ERROR, "Error loading story"),
    (Language::En, LabelDomain::UiString, ui::STORY_EMPTY, "Could not load the story content."),
    (Language::En, LabelDomain::UiString, ui::CATALOG_ERROR, "Error loading stories"),
    (Language::En, LabelDomain::UiString, ui::NO_RESULTS, "No stories found"),
    (Language::En, LabelDomain::UiString, ui::PAGE_TITLE, "Ravi's Stories - Telugu Stories Collection"),
];

/// Two-level label table: `(language, domain)` then key.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    entries: HashMap<(Language, LabelDomain), HashMap<String, String>>,
}

impl LabelTable {
    /// A table with no labels; every lookup falls back to the key.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in Telugu and English labels.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (lang, domain, key, value) in BUILTIN {
            table.insert(*lang, *domain, *key, *value);
        }
        table
    }

    /// Add or replace a label.
    pub fn insert(
        &mut self,
        language: Language,
        domain: LabelDomain,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.entries
            .entry((language, domain))
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Look up a label, falling back to `key` when absent or empty.
    pub fn resolve<'a>(&'a self, domain: LabelDomain, key: &'a str, language: Language) -> &'a str {
        self.entries
            .get(&(language, domain))
            .and_then(|m| m.get(key))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .unwrap_or(key)
    }

    /// Display name of a category tag.
    pub fn category_name(&self, category: Category, language: Language) -> &str {
        self.resolve(LabelDomain::CategoryName, category.key(), language)
    }

    /// Display name of a length bucket tag.
    pub fn length_name(&self, length: LengthBucket, language: Language) -> &str {
        self.resolve(LabelDomain::CategoryName, length.key(), language)
    }

    /// Label for a category option in the filter control.
    pub fn category_filter_name(&self, category: Category, language: Language) -> &str {
        self.resolve(LabelDomain::CategoryFilterName, category.key(), language)
    }

    pub fn ui(&self, key: &'static str, language: Language) -> &str {
        self.resolve(LabelDomain::UiString, key, language)
    }

    /// Resolve a UI string and substitute its `{count}` placeholder.
    pub fn ui_with_count(&self, key: &'static str, language: Language, count: usize) -> String {
        fill_count(self.ui(key, language), count)
    }

    /// All labels of one domain for a language, sorted by key.
    pub fn domain_labels(&self, domain: LabelDomain, language: Language) -> Vec<(String, String)> {
        let mut labels: Vec<(String, String)> = self
            .entries
            .get(&(language, domain))
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        labels.sort();
        labels
    }
}

/// Replace every `{count}` in `template` with `count`.
pub fn fill_count(template: &str, count: usize) -> String {
    template.replace(COUNT_PLACEHOLDER, &count.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        let labels = LabelTable::builtin();
        for domain in LabelDomain::ALL {
            assert_eq!(labels.resolve(domain, "unknown-key", Language::En), "unknown-key");
        }
    }

    #[test]
    fn test_empty_table_falls_back() {
        let labels = LabelTable::empty();
        assert_eq!(labels.category_name(Category::Kids, Language::Te), "kids");
    }

    #[test]
    fn test_builtin_categories_in_both_languages() {
        let labels = LabelTable::builtin();
        assert_eq!(labels.category_name(Category::Family, Language::Te), "కుటుంబం");
        assert_eq!(labels.category_name(Category::Philosophical, Language::En), "Philosophy");
        assert_eq!(labels.length_name(LengthBucket::Long, Language::Te), "పెద్ద");
        assert_eq!(
            labels.category_filter_name(Category::Kids, Language::En),
            "Children Stories"
        );
    }

    #[test]
    fn test_every_category_has_labels_in_every_language() {
        let labels = LabelTable::builtin();
        for lang in Language::ALL {
            for c in Category::PRIORITY {
                assert_ne!(labels.category_name(c, lang), c.key());
                assert_ne!(labels.category_filter_name(c, lang), c.key());
            }
        }
    }

    #[test]
    fn test_length_names_are_not_filter_names() {
        let labels = LabelTable::builtin();
        assert_eq!(
            labels.resolve(LabelDomain::CategoryFilterName, "short", Language::En),
            "short"
        );
    }

    #[test]
    fn test_count_substitution() {
        let labels = LabelTable::builtin();
        assert_eq!(
            labels.ui_with_count(ui::LOAD_MORE, Language::En, 12),
            "Load More Stories (12)"
        );
        assert_eq!(
            labels.ui_with_count(ui::LOAD_MORE, Language::Te, 3),
            "మరిన్ని కథలు లోడ్ చేయండి (3)"
        );
        assert_eq!(fill_count("no placeholder", 5), "no placeholder");
    }

    #[test]
    fn test_override_replaces_builtin() {
        let mut labels = LabelTable::builtin();
        labels.insert(Language::En, LabelDomain::UiString, ui::READ_MORE, "Open");
        assert_eq!(labels.ui(ui::READ_MORE, Language::En), "Open");
        assert_eq!(labels.ui(ui::READ_MORE, Language::Te), "ఇక కథ లోకి");
    }

    #[test]
    fn test_empty_override_falls_back_to_key() {
        let mut labels = LabelTable::builtin();
        labels.insert(Language::En, LabelDomain::UiString, ui::READ_MORE, "");
        assert_eq!(labels.ui(ui::READ_MORE, Language::En), "readMore");
    }

    #[test]
    fn test_domain_parse() {
        assert_eq!("ui".parse::<LabelDomain>().unwrap(), LabelDomain::UiString);
        assert_eq!(
            "categoryFilters".parse::<LabelDomain>().unwrap(),
            LabelDomain::CategoryFilterName
        );
        assert!("menu".parse::<LabelDomain>().is_err());
    }

    #[test]
    fn test_domain_key_parses_back() {
        for domain in LabelDomain::ALL {
            assert_eq!(domain.key().parse::<LabelDomain>().unwrap(), domain);
        }
    }
}
