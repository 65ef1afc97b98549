//! Gallery views: filtered, paginated story cards and filter facets.
//!
//! The same view types back the `kathalu list` / `kathalu facets` commands
//! and the `GET /stories` / `GET /facets` endpoints, so both surfaces label
//! and paginate identically.

use anyhow::{Context, Result};
use kathalu_core::filter::Facets;
use kathalu_core::labels::ui;
use kathalu_core::{
    load_more_label, Category, CatalogStore, FilterCriteria, LabelTable, Language, LengthBucket,
    Paginator, Story,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Raw filter parameters as typed by a user or sent in a query string.
///
/// Empty values and `all` mean "no constraint" on that dimension.
#[derive(Debug, Clone, Default, Deserialize, clap::Args)]
pub struct FilterParams {
    /// Only stories from this year
    #[arg(long)]
    #[serde(default)]
    pub year: Option<String>,

    /// Only stories tagged with this category (family, spiritual, travel, kids, philosophical, general)
    #[arg(long)]
    #[serde(default)]
    pub category: Option<String>,

    /// Only short or long stories
    #[arg(long)]
    #[serde(default)]
    pub length: Option<String>,

    /// Case-insensitive search over title and excerpt
    #[arg(short = 'q', long = "search")]
    #[serde(default)]
    pub q: Option<String>,
}

fn selected(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl FilterParams {
    pub fn to_criteria(&self) -> Result<FilterCriteria> {
        let mut criteria = FilterCriteria::none();
        if let Some(year) = selected(&self.year) {
            let year: i32 = year
                .parse()
                .with_context(|| format!("invalid year: '{}'", year))?;
            criteria = criteria.with_year(year);
        }
        if let Some(category) = selected(&self.category) {
            criteria = criteria.with_category(category.parse::<Category>()?);
        }
        if let Some(length) = selected(&self.length) {
            criteria = criteria.with_length(length.parse::<LengthBucket>()?);
        }
        if let Some(ref q) = self.q {
            criteria = criteria.with_search(q.clone());
        }
        Ok(criteria)
    }
}

/// One story as shown in the gallery, with labels resolved.
#[derive(Debug, Clone, Serialize)]
pub struct StoryCard {
    pub id: String,
    pub file: String,
    pub title: String,
    pub excerpt: String,
    pub year: i32,
    pub word_count: u32,
    pub words_label: String,
    pub category: Category,
    pub category_label: String,
    pub length: LengthBucket,
    pub length_label: String,
    pub read_more_label: String,
}

impl StoryCard {
    pub fn new(story: &Story, labels: &LabelTable, language: Language) -> Self {
        let category = story.primary_category();
        Self {
            id: story.id.clone(),
            file: story.file.clone(),
            title: story.title.clone(),
            excerpt: story.excerpt.clone(),
            year: story.year,
            word_count: story.word_count,
            words_label: labels.ui(ui::WORDS, language).to_string(),
            category,
            category_label: labels.category_name(category, language).to_string(),
            length: story.length,
            length_label: labels.length_name(story.length, language).to_string(),
            read_more_label: labels.ui(ui::READ_MORE, language).to_string(),
        }
    }
}

/// The displayed prefix of a filtered catalog plus paging state.
#[derive(Debug, Clone, Serialize)]
pub struct BrowsePage {
    pub language: Language,
    pub total: usize,
    pub filtered: usize,
    pub page: usize,
    pub page_size: usize,
    pub stories: Vec<StoryCard>,
    pub has_more: bool,
    pub remaining: usize,
    pub load_more_label: Option<String>,
    /// Set when the filters match nothing.
    pub no_results_label: Option<String>,
}

impl BrowsePage {
    pub fn new(
        filtered: &[&Story],
        paginator: &Paginator,
        total: usize,
        language: Language,
        labels: &LabelTable,
    ) -> Self {
        let stories = paginator
            .page(filtered)
            .iter()
            .map(|s| StoryCard::new(s, labels, language))
            .collect();
        Self {
            language,
            total,
            filtered: filtered.len(),
            page: paginator.current_page(),
            page_size: paginator.page_size(),
            stories,
            has_more: paginator.has_more(filtered.len()),
            remaining: paginator.remaining(filtered.len()),
            load_more_label: load_more_label(labels, language, paginator, filtered.len()),
            no_results_label: filtered
                .is_empty()
                .then(|| labels.ui(ui::NO_RESULTS, language).to_string()),
        }
    }

    pub fn from_store(store: &CatalogStore, labels: &LabelTable) -> Self {
        Self::new(
            &store.filtered(),
            store.paginator(),
            store.len(),
            store.language(),
            labels,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FacetOption {
    pub key: String,
    pub label: String,
}

/// Filter control options with labels for one language.
#[derive(Debug, Clone, Serialize)]
pub struct FacetsView {
    pub language: Language,
    pub years: Vec<i32>,
    pub categories: Vec<FacetOption>,
    pub lengths: Vec<FacetOption>,
}

impl FacetsView {
    pub fn new(facets: &Facets, labels: &LabelTable, language: Language) -> Self {
        Self {
            language,
            years: facets.years.clone(),
            categories: facets
                .categories
                .iter()
                .map(|&c| FacetOption {
                    key: c.key().to_string(),
                    label: labels.category_filter_name(c, language).to_string(),
                })
                .collect(),
            lengths: [LengthBucket::Short, LengthBucket::Long]
                .iter()
                .map(|&l| FacetOption {
                    key: l.key().to_string(),
                    label: labels.length_name(l, language).to_string(),
                })
                .collect(),
        }
    }
}

fn print_card(card: &StoryCard) {
    println!("[{}] {}  ({})", card.year, card.title, card.id);
    println!(
        "       {} · {} · {} {}",
        card.category_label, card.length_label, card.word_count, card.words_label
    );
    println!("       {}", card.excerpt);
    println!();
}

/// CLI entry point for `kathalu list`.
pub fn run_list(
    config: &Config,
    store: &mut CatalogStore,
    params: &FilterParams,
    page: usize,
    json: bool,
) -> Result<()> {
    let labels = config.label_table()?;
    store.set_filters(params.to_criteria()?);
    store.show_page(page);

    let view = BrowsePage::from_store(store, &labels);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{}", labels.ui(ui::PAGE_TITLE, view.language));
    println!(
        "{} of {} stories match, showing {}",
        view.filtered,
        view.total,
        view.stories.len()
    );
    println!();

    if let Some(ref msg) = view.no_results_label {
        println!("{}", msg);
        return Ok(());
    }

    for card in &view.stories {
        print_card(card);
    }

    if let Some(ref label) = view.load_more_label {
        println!("{}  (--page {})", label, view.page + 1);
    }

    Ok(())
}

/// CLI entry point for `kathalu facets`.
pub fn run_facets(config: &Config, store: &CatalogStore, json: bool) -> Result<()> {
    let labels = config.label_table()?;
    let view = FacetsView::new(&store.facets(), &labels, store.language());

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let years: Vec<String> = view.years.iter().map(|y| y.to_string()).collect();
    println!("years:      {}", years.join(", "));
    println!("categories:");
    for c in &view.categories {
        println!("  {:<14} {}", c.key, c.label);
    }
    println!("lengths:");
    for l in &view.lengths {
        println!("  {:<14} {}", l.key, l.label);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kathalu_core::categorize::categorize;
    use kathalu_core::models::estimate_word_count;

    fn story(i: usize, title: &str, year: i32, text_length: u32) -> Story {
        Story {
            id: format!("s{}", i),
            file: format!("{}/s{}.html", year, i),
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

    fn params(year: &str, category: &str, length: &str, q: &str) -> FilterParams {
        let opt = |v: &str| Some(v.to_string());
        FilterParams {
            year: opt(year),
            category: opt(category),
            length: opt(length),
            q: opt(q),
        }
    }

    #[test]
    fn test_all_and_empty_mean_unconstrained() {
        let criteria = params("all", "", "ALL", "  ").to_criteria().unwrap();
        assert!(criteria.is_unconstrained());
    }

    #[test]
    fn test_params_parse() {
        let criteria = params("2020", "travel", "short", "Trip").to_criteria().unwrap();
        assert_eq!(criteria.year, Some(2020));
        assert_eq!(criteria.category, Some(Category::Travel));
        assert_eq!(criteria.length, Some(LengthBucket::Short));
        assert_eq!(criteria.search_needle().as_deref(), Some("trip"));
    }

    #[test]
    fn test_bad_params_rejected() {
        assert!(params("twenty", "", "", "").to_criteria().is_err());
        assert!(params("", "horror", "", "").to_criteria().is_err());
        assert!(params("", "", "medium", "").to_criteria().is_err());
    }

    #[test]
    fn test_browse_page_labels() {
        let stories: Vec<Story> = (0..15)
            .map(|i| story(i, "అమ్మ", 2020, 1500))
            .collect();
        let mut store = CatalogStore::new(stories, 12);
        store.set_language(Language::En);
        let labels = LabelTable::builtin();

        let view = BrowsePage::from_store(&store, &labels);
        assert_eq!(view.stories.len(), 12);
        assert_eq!(view.remaining, 3);
        assert_eq!(view.load_more_label.as_deref(), Some("Load More Stories"));
        assert!(view.no_results_label.is_none());

        let card = &view.stories[0];
        assert_eq!(card.category_label, "Family");
        assert_eq!(card.length_label, "Long");
        assert_eq!(card.words_label, "words");
        assert_eq!(card.word_count, 300);
    }

    #[test]
    fn test_no_results_view() {
        let mut store = CatalogStore::new(vec![story(0, "x", 2020, 10)], 12);
        store.set_filters(FilterCriteria::none().with_year(1999));
        let view = BrowsePage::from_store(&store, &LabelTable::builtin());
        assert_eq!(view.no_results_label.as_deref(), Some("కథలు కనుగొనబడలేదు"));
        assert!(view.stories.is_empty());
        assert!(view.load_more_label.is_none());
    }

    #[test]
    fn test_facets_view() {
        let store = CatalogStore::new(
            vec![story(0, "అమ్మ", 2019, 10), story(1, "యాత్ర", 2021, 10)],
            12,
        );
        let view = FacetsView::new(&store.facets(), &LabelTable::builtin(), Language::En);
        assert_eq!(view.years, vec![2021, 2019]);
        let keys: Vec<&str> = view.categories.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["family", "travel"]);
        assert_eq!(view.categories[1].label, "Travel Stories");
        assert_eq!(view.lengths[0].label, "Short");
    }
}
