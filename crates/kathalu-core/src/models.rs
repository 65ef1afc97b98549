//! Core data models used throughout Kathalu.
//!
//! These types describe the canonical story record produced by ingestion and
//! the small closed vocabularies (category, length bucket, language) that the
//! filter, pagination, and label layers operate on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stories whose length is below this value fall into [`LengthBucket::Short`].
pub const SHORT_STORY_THRESHOLD: u32 = 1000;

/// Rough characters-per-word ratio used to estimate a word count from a
/// character length.
pub const CHARS_PER_WORD: u32 = 5;

/// Error returned when a string does not name a known tag or language.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseTagError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseTagError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Thematic category of a story.
///
/// Variants are declared in classification priority order; see
/// [`Category::PRIORITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Family,
    Spiritual,
    Travel,
    Kids,
    Philosophical,
    General,
}

impl Category {
    /// All categories, highest classification priority first.
    pub const PRIORITY: [Category; 6] = [
        Category::Family,
        Category::Spiritual,
        Category::Travel,
        Category::Kids,
        Category::Philosophical,
        Category::General,
    ];

    /// The stable lowercase key used in data files, URLs, and label tables.
    pub fn key(self) -> &'static str {
        match self {
            Category::Family => "family",
            Category::Spiritual => "spiritual",
            Category::Travel => "travel",
            Category::Kids => "kids",
            Category::Philosophical => "philosophical",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "family" => Ok(Category::Family),
            "spiritual" => Ok(Category::Spiritual),
            "travel" => Ok(Category::Travel),
            "kids" => Ok(Category::Kids),
            "philosophical" => Ok(Category::Philosophical),
            "general" => Ok(Category::General),
            _ => Err(ParseTagError::new("category", s)),
        }
    }
}

/// Binary length classification of a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthBucket {
    Short,
    Long,
}

impl LengthBucket {
    /// Bucket for a content length: `short` below [`SHORT_STORY_THRESHOLD`].
    pub fn from_length(length: u32) -> Self {
        if length < SHORT_STORY_THRESHOLD {
            LengthBucket::Short
        } else {
            LengthBucket::Long
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            LengthBucket::Short => "short",
            LengthBucket::Long => "long",
        }
    }
}

impl fmt::Display for LengthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for LengthBucket {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(LengthBucket::Short),
            "long" => Ok(LengthBucket::Long),
            _ => Err(ParseTagError::new("length bucket", s)),
        }
    }
}

/// Display language. Affects label resolution only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Telugu.
    #[default]
    Te,
    /// English.
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Te, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Language::Te => "te",
            Language::En => "en",
        }
    }

    /// The other language.
    pub fn toggled(self) -> Self {
        match self {
            Language::Te => Language::En,
            Language::En => Language::Te,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "te" => Ok(Language::Te),
            "en" => Ok(Language::En),
            _ => Err(ParseTagError::new("language", s)),
        }
    }
}

/// Canonical story record, immutable once loaded.
///
/// Produced by the ingestion adapter regardless of which data shape the
/// source file uses. `categories` and `length` are resolved at ingestion
/// time (stored values win over derived ones), so nothing downstream needs to
/// know where they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// Stable identifier (explicit id or the file stem).
    pub id: String,
    /// Reference handed to the content loader.
    pub file: String,
    pub title: String,
    pub excerpt: String,
    pub year: i32,
    /// Content length in the data set's unit (characters or words).
    pub text_length: u32,
    pub word_count: u32,
    /// Topic tags, never empty, ordered by classification priority.
    pub categories: Vec<Category>,
    pub length: LengthBucket,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl Story {
    /// The single category used for display.
    pub fn primary_category(&self) -> Category {
        self.categories
            .first()
            .copied()
            .unwrap_or(Category::General)
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

/// Estimate a word count from a character length.
pub fn estimate_word_count(text_length: u32) -> u32 {
    let rounded = (u64::from(text_length) + u64::from(CHARS_PER_WORD / 2)) / u64::from(CHARS_PER_WORD);
    rounded as u32
}
