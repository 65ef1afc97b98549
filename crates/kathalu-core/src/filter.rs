//! Multi-predicate story filtering.
//!
//! A [`FilterCriteria`] holds four independent optional constraints. A story
//! passes when every active constraint passes. Filtering is a stable pass
//! over the whole catalog: the result preserves catalog order and is
//! recomputed from scratch on every criteria change.
//!
//! # Predicates
//!
//! | Constraint | Passes when |
//! |------------|-------------|
//! | `year` | `story.year == year` |
//! | `category` | the story's category set contains `category` |
//! | `length` | `story.length == length` |
//! | `search` | lower-cased `title + " " + excerpt` contains the lower-cased, trimmed term |
//!
//! An empty or whitespace-only search term is no constraint.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{Category, LengthBucket, Story};

/// Active filter constraints. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub year: Option<i32>,
    pub category: Option<Category>,
    pub length: Option<LengthBucket>,
    pub search: Option<String>,
}

impl FilterCriteria {
    /// Criteria with no active constraint.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_length(mut self, length: LengthBucket) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// The normalized search needle, or `None` when the term is blank.
    pub fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
    }

    /// True when no constraint is active.
    pub fn is_unconstrained(&self) -> bool {
        self.year.is_none()
            && self.category.is_none()
            && self.length.is_none()
            && self.search_needle().is_none()
    }
}

/// Evaluate all active constraints against one story.
pub fn matches(story: &Story, criteria: &FilterCriteria) -> bool {
    matches_with_needle(story, criteria, criteria.search_needle().as_deref())
}

fn matches_with_needle(story: &Story, criteria: &FilterCriteria, needle: Option<&str>) -> bool {
    if let Some(year) = criteria.year {
        if story.year != year {
            return false;
        }
    }

    if let Some(category) = criteria.category {
        if !story.has_category(category) {
            return false;
        }
    }

    if let Some(length) = criteria.length {
        if story.length != length {
            return false;
        }
    }

    if let Some(needle) = needle {
        let haystack = format!("{} {}", story.title, story.excerpt).to_lowercase();
        if !haystack.contains(needle) {
            return false;
        }
    }

    true
}

/// Filter the catalog, preserving catalog order.
pub fn apply_filters<'a>(catalog: &'a [Story], criteria: &FilterCriteria) -> Vec<&'a Story> {
    filter_indices(catalog, criteria)
        .into_iter()
        .map(|i| &catalog[i])
        .collect()
}

/// Like [`apply_filters`] but returns catalog positions.
pub fn filter_indices(catalog: &[Story], criteria: &FilterCriteria) -> Vec<usize> {
    let needle = criteria.search_needle();
    catalog
        .iter()
        .enumerate()
        .filter(|(_, story)| matches_with_needle(story, criteria, needle.as_deref()))
        .map(|(i, _)| i)
        .collect()
}

/// Filter options available for a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// Distinct years, newest first.
    pub years: Vec<i32>,
    /// Every category tag present, sorted by key.
    pub categories: Vec<Category>,
}

/// Collect the distinct years and category tags of a catalog.
pub fn facets(catalog: &[Story]) -> Facets {
    let years: BTreeSet<i32> = catalog.iter().map(|s| s.year).collect();
    let categories: BTreeSet<&'static str> = catalog
        .iter()
        .flat_map(|s| s.categories.iter().map(|c| c.key()))
        .collect();

    Facets {
        years: years.into_iter().rev().collect(),
        categories: categories
            .into_iter()
            .filter_map(|key| key.parse().ok())
            .collect(),
    }
}
