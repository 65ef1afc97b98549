//! Catalog store: the browsing session state.
//!
//! [`CatalogStore`] owns the loaded collection, the current filter criteria,
//! the filtered subset, the pagination cursor, and the display language.
//! Every mutation goes through a named transition:
//!
//! | Transition | Effect |
//! |------------|--------|
//! | [`set_filters`](CatalogStore::set_filters) | recompute the filtered subset, reset to page 1 |
//! | [`load_more`](CatalogStore::load_more) | grow the displayed prefix by one page |
//! | [`set_language`](CatalogStore::set_language) | change label language only |
//!
//! The store is not internally synchronized. A multi-threaded host must wrap
//! it in a single-writer/multi-reader lock.

use crate::filter::{facets, filter_indices, Facets, FilterCriteria};
use crate::labels::{ui, LabelTable};
use crate::models::{Language, Story};
use crate::paginate::Paginator;

/// Loaded catalog plus browsing state.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    stories: Vec<Story>,
    criteria: FilterCriteria,
    filtered: Vec<usize>,
    paginator: Paginator,
    language: Language,
}

impl CatalogStore {
    /// A store over `stories` with no active filters, on page 1.
    pub fn new(stories: Vec<Story>, page_size: usize) -> Self {
        let filtered = (0..stories.len()).collect();
        Self {
            stories,
            criteria: FilterCriteria::none(),
            filtered,
            paginator: Paginator::new(page_size),
            language: Language::default(),
        }
    }

    /// A store with no stories. Used when the catalog fails to load.
    pub fn empty(page_size: usize) -> Self {
        Self::new(Vec::new(), page_size)
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Story> {
        self.stories.iter().find(|s| s.id == id)
    }

    pub fn facets(&self) -> Facets {
        facets(&self.stories)
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Replace the filter criteria and recompute the filtered subset.
    ///
    /// Always resets pagination to page 1, even when the criteria are
    /// unchanged.
    pub fn set_filters(&mut self, criteria: FilterCriteria) {
        self.filtered = filter_indices(&self.stories, &criteria);
        self.criteria = criteria;
        self.paginator.reset();
    }

    /// Show one more page.
    pub fn load_more(&mut self) {
        self.paginator.load_more();
    }

    /// Jump to a page directly (used by stateless callers such as the HTTP API).
    pub fn show_page(&mut self, page: usize) {
        self.paginator.set_page(page);
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Switch to the other language and return it.
    pub fn toggle_language(&mut self) -> Language {
        self.language = self.language.toggled();
        self.language
    }

    /// The full filtered subset, in catalog order.
    pub fn filtered(&self) -> Vec<&Story> {
        self.filtered.iter().map(|&i| &self.stories[i]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// The currently displayed prefix of the filtered subset.
    pub fn displayed(&self) -> Vec<&Story> {
        self.paginator
            .page(&self.filtered)
            .iter()
            .map(|&i| &self.stories[i])
            .collect()
    }

    pub fn has_more(&self) -> bool {
        self.paginator.has_more(self.filtered.len())
    }

    /// Filtered items not yet displayed.
    pub fn remaining(&self) -> usize {
        self.paginator.remaining(self.filtered.len())
    }

    /// True when the active filters match nothing.
    pub fn is_no_results(&self) -> bool {
        self.filtered.is_empty()
    }

    /// Text for the "load more" control, or `None` when it should be hidden.
    pub fn load_more_label(&self, labels: &LabelTable) -> Option<String> {
        load_more_label(labels, self.language, &self.paginator, self.filtered.len())
    }
}

/// Text for the "load more" control given a cursor over `total` items.
///
/// When more than a full page remains the counted variant is used with
/// `min(remaining, page_size)`; otherwise the plain variant. `None` once
/// everything is displayed.
pub fn load_more_label(
    labels: &LabelTable,
    language: Language,
    paginator: &Paginator,
    total: usize,
) -> Option<String> {
    if !paginator.has_more(total) {
        return None;
    }
    let remaining = paginator.remaining(total);
    let page_size = paginator.page_size();
    if remaining > page_size {
        Some(labels.ui_with_count(ui::LOAD_MORE, language, remaining.min(page_size)))
    } else {
        Some(labels.ui(ui::LOAD_MORE_DEFAULT, language).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorize::categorize;
    use crate::models::{estimate_word_count, Category, LengthBucket};

    fn story(i: usize, title: &str, year: i32, text_length: u32) -> Story {
        Story {
            id: format!("story-{}", i),
            file: format!("{}/story-{}.html", year, i),
            title: title.to_string(),
            excerpt: title.to_string(),
            year,
            text_length,
            word_count: estimate_word_count(text_length),
            categories: vec![categorize(title)],
            length: LengthBucket::from_length(text_length),
            date: None,
        }
    }

    fn catalog(n: usize) -> Vec<Story> {
        (0..n)
            .map(|i| story(i, &format!("కథ {}", i), 2020 + (i % 3) as i32, 200 * i as u32))
            .collect()
    }

    fn ids(stories: &[&Story]) -> Vec<String> {
        stories.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn test_fifteen_stories_two_pages() {
        let mut store = CatalogStore::new(catalog(15), 12);
        assert_eq!(store.displayed().len(), 12);
        assert!(store.has_more());

        store.load_more();
        assert_eq!(store.displayed().len(), 15);
        assert!(!store.has_more());
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut store = CatalogStore::new(catalog(40), 12);
        store.load_more();
        store.load_more();
        assert_eq!(store.paginator().current_page(), 3);

        store.set_filters(FilterCriteria::none().with_year(2020));
        assert_eq!(store.paginator().current_page(), 1);
        assert_eq!(store.displayed().len(), 12);
    }

    #[test]
    fn test_same_criteria_still_resets_page() {
        let mut store = CatalogStore::new(catalog(30), 12);
        store.load_more();
        store.set_filters(store.criteria().clone());
        assert_eq!(store.paginator().current_page(), 1);
    }

    #[test]
    fn test_filtered_preserves_order() {
        let mut store = CatalogStore::new(catalog(9), 12);
        store.set_filters(FilterCriteria::none().with_year(2021));
        assert_eq!(
            ids(&store.filtered()),
            vec!["story-1", "story-4", "story-7"]
        );
    }

    #[test]
    fn test_no_results_state() {
        let mut store = CatalogStore::new(catalog(5), 12);
        store.set_filters(FilterCriteria::none().with_year(1990));
        assert!(store.is_no_results());
        assert!(store.displayed().is_empty());
        assert!(!store.has_more());
        assert_eq!(store.load_more_label(&LabelTable::builtin()), None);
    }

    #[test]
    fn test_empty_store() {
        let store = CatalogStore::empty(12);
        assert!(store.is_empty());
        assert!(store.is_no_results());
        assert!(store.facets().years.is_empty());
    }

    #[test]
    fn test_load_more_label_policy() {
        let labels = LabelTable::builtin();

        let mut store = CatalogStore::new(catalog(30), 12);
        store.set_language(Language::En);
        // 18 remaining: more than a page, counted variant with a full page
        assert_eq!(
            store.load_more_label(&labels).as_deref(),
            Some("Load More Stories (12)")
        );

        store.load_more();
        // 6 remaining: plain variant
        assert_eq!(
            store.load_more_label(&labels).as_deref(),
            Some("Load More Stories")
        );

        store.load_more();
        assert_eq!(store.load_more_label(&labels), None);
    }

    #[test]
    fn test_language_only_changes_labels() {
        let labels = LabelTable::builtin();
        let mut store = CatalogStore::new(catalog(20), 12);
        let before = ids(&store.displayed());

        assert_eq!(store.toggle_language(), Language::En);
        assert_eq!(ids(&store.displayed()), before);
        assert_eq!(
            store.load_more_label(&labels).as_deref(),
            Some("Load More Stories")
        );

        store.set_language(Language::Te);
        assert_eq!(
            store.load_more_label(&labels).as_deref(),
            Some("మరిన్ని కథలు లోడ్ చేయండి")
        );
    }

    #[test]
    fn test_find_by_id() {
        let store = CatalogStore::new(catalog(3), 12);
        assert_eq!(store.find("story-2").map(|s| s.year), Some(2022));
        assert!(store.find("missing").is_none());
    }

    #[test]
    fn test_mixed_family_travel_title() {
        let store = CatalogStore::new(vec![story(0, "అమ్మ కోసం ప్రయాణం", 2020, 10)], 12);
        assert_eq!(store.stories()[0].primary_category(), Category::Family);
    }
}
