//! Story retrieval by ID.
//!
//! Looks up a story in the catalog and loads its full text through the
//! configured [`ContentLoader`]. Used by both the `kathalu show` CLI command
//! and the `GET /stories/{id}` and `GET /stories/{id}/content` endpoints.

use anyhow::{bail, Result};
use kathalu_core::labels::ui;
use kathalu_core::{CatalogStore, LabelTable, Language};
use serde::Serialize;

use crate::browse::StoryCard;
use crate::config::Config;
use crate::content::{load_story_content, ContentLoader, ContentState};

/// A story card together with its loaded text.
#[derive(Debug, Clone, Serialize)]
pub struct StoryView {
    pub story: StoryCard,
    pub content: ContentState,
    /// Label to show instead of the text (loading, empty or error states).
    pub status_label: Option<String>,
}

impl StoryView {
    pub fn new(story: StoryCard, content: ContentState, labels: &LabelTable, lang: Language) -> Self {
        let status_label = content
            .label_key()
            .map(|key| labels.ui(key, lang).to_string());
        Self {
            story,
            content,
            status_label,
        }
    }
}

/// Core show function returning structured data (used by CLI and server).
pub async fn show_story(
    config: &Config,
    store: &CatalogStore,
    loader: &dyn ContentLoader,
    labels: &LabelTable,
    id: &str,
    lang: Language,
) -> Result<StoryView> {
    let Some(story) = store.find(id) else {
        bail!("story not found: {}", id);
    };
    let card = StoryCard::new(story, labels, lang);
    let content = load_story_content(loader, story, &config.content.boilerplate).await;
    Ok(StoryView::new(card, content, labels, lang))
}

/// CLI entry point: calls show_story and prints to stdout.
pub async fn run_show(
    config: &Config,
    store: &CatalogStore,
    loader: &dyn ContentLoader,
    id: &str,
    json: bool,
) -> Result<()> {
    let labels = config.label_table()?;
    let lang = store.language();

    if !json {
        eprintln!("{}", labels.ui(ui::STORY_LOADING, lang));
    }

    let view = show_story(config, store, loader, &labels, id, lang).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let card = &view.story;
    println!("--- {} ---", card.title);
    println!("id:       {}", card.id);
    println!("file:     {}", card.file);
    println!("year:     {}", card.year);
    println!("category: {}", card.category_label);
    println!("length:   {}", card.length_label);
    println!("size:     {} {}", card.word_count, card.words_label);
    println!();

    match view.content {
        ContentState::Loaded { ref paragraphs } => {
            for p in paragraphs {
                println!("{}", p);
                println!();
            }
        }
        ContentState::Failed { ref message } => {
            println!("{}", view.status_label.as_deref().unwrap_or_default());
            bail!("failed to load story content: {}", message);
        }
        _ => {
            println!("{}", view.status_label.as_deref().unwrap_or_default());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{FetchError, FsContentLoader};
    use crate::ingest::parse_catalog;
    use async_trait::async_trait;

    struct FailingLoader;

    #[async_trait]
    impl ContentLoader for FailingLoader {
        async fn fetch(&self, file: &str) -> Result<String, FetchError> {
            Err(FetchError::Status {
                status: 503,
                url: file.to_string(),
            })
        }
    }

    fn store() -> CatalogStore {
        let json = r#"[{"title": "అమ్మ", "filename": "2020/amma.html", "year": 2020}]"#;
        let loaded = parse_catalog(json, crate::config::CatalogShape::Auto).unwrap();
        CatalogStore::new(loaded.stories, 12)
    }

    #[tokio::test]
    async fn test_show_loaded_story() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("2020")).unwrap();
        std::fs::write(
            dir.path().join("2020/amma.html"),
            "<div class=\"story-body\"><p>ఒకప్పుడు</p></div>",
        )
        .unwrap();
        let loader = FsContentLoader::new(dir.path());
        let labels = LabelTable::builtin();

        let view = show_story(&Config::minimal(), &store(), &loader, &labels, "amma", Language::En)
            .await
            .unwrap();
        assert_eq!(view.story.category_label, "Family");
        assert_eq!(
            view.content,
            ContentState::Loaded {
                paragraphs: vec!["ఒకప్పుడు".to_string()]
            }
        );
        assert!(view.status_label.is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_distinct_state() {
        let labels = LabelTable::builtin();
        let view = show_story(&Config::minimal(), &store(), &FailingLoader, &labels, "amma", Language::Te)
            .await
            .unwrap();
        assert!(matches!(view.content, ContentState::Failed { .. }));
        assert_eq!(view.status_label.as_deref(), Some("కథ లోడ్ చేయడంలో లోపం"));
    }

    #[tokio::test]
    async fn test_run_show_fails_when_content_fails() {
        let err = run_show(&Config::minimal(), &store(), &FailingLoader, "amma", false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to load story content"));
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let labels = LabelTable::builtin();
        let err = show_story(&Config::minimal(), &store(), &FailingLoader, &labels, "nope", Language::Te)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("story not found"));
    }
}
