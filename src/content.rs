//! Story content loading: fetch a story page and extract its text.
//!
//! A story's `file` reference is resolved by a [`ContentLoader`], either
//! against a local directory ([`FsContentLoader`]) or a base URL
//! ([`HttpContentLoader`]). The fetched HTML is reduced to paragraphs by
//! [`extract_story_text`]:
//!
//! 1. Locate the body: `.story-body`, then `main .story-content .story-body`,
//!    `.story-content`, `article`.
//! 2. Skip any text under `script, style, .story-tags, .tag, nav, .nav,
//!    .navigation, .header, .footer`.
//! 3. Split into lines, trim, drop empty lines and lines containing a
//!    boilerplate string.
//!
//! The outcome is reported as a [`ContentState`] so callers can tell a
//! missing body apart from a failed fetch.

use async_trait::async_trait;
use kathalu_core::labels::ui;
use kathalu_core::Story;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ContentConfig;

const BODY_SELECTORS: [&str; 4] = [
    ".story-body",
    "main .story-content .story-body",
    ".story-content",
    "article",
];

const EXCLUDED: &str = "script, style, .story-tags, .tag, nav, .nav, .navigation, .header, .footer";

/// Elements that start a new line of text.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote",
    "section", "article", "header", "footer", "pre", "tr", "hr",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("story file not found: {0}")]
    NotFound(String),
    #[error("invalid story path: {0}")]
    InvalidPath(String),
    #[error("failed to read {file}: {message}")]
    Io { file: String, message: String },
    #[error("HTTP {status} fetching {url}")]
    Status { status: u16, url: String },
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("no story text found")]
    NoStoryBody,
}

/// Fetches raw story documents by their catalog `file` reference.
#[async_trait]
pub trait ContentLoader: Send + Sync {
    async fn fetch(&self, file: &str) -> Result<String, FetchError>;
}

/// Reads story files below a local directory.
#[derive(Debug, Clone)]
pub struct FsContentLoader {
    root: PathBuf,
}

impl FsContentLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `file` under the root, refusing absolute paths and `..`.
    fn resolve(&self, file: &str) -> Result<PathBuf, FetchError> {
        let rel = Path::new(file);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if file.trim().is_empty() || escapes {
            return Err(FetchError::InvalidPath(file.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl ContentLoader for FsContentLoader {
    async fn fetch(&self, file: &str) -> Result<String, FetchError> {
        let path = self.resolve(file)?;
        tracing::debug!(path = %path.display(), "reading story file");
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound(file.to_string())
            } else {
                FetchError::Io {
                    file: file.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }
}

/// Fetches story pages relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpContentLoader {
    client: reqwest::Client,
    base_url: String,
}

impl HttpContentLoader {
    pub fn new(base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self { client, base_url })
    }

    pub fn url_for(&self, file: &str) -> String {
        format!("{}{}", self.base_url, file.trim_start_matches('/'))
    }
}

#[async_trait]
impl ContentLoader for HttpContentLoader {
    async fn fetch(&self, file: &str) -> Result<String, FetchError> {
        let url = self.url_for(file);
        tracing::debug!(url = %url, "fetching story page");
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.clone(),
            message: e.to_string(),
        };
        let resp = self.client.get(&url).send().await.map_err(transport)?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(file.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.clone(),
            });
        }
        resp.text().await.map_err(transport)
    }
}

/// Build the loader for the configured content source.
pub fn loader_from_config(config: &ContentConfig) -> anyhow::Result<Arc<dyn ContentLoader>> {
    match config.base_url {
        Some(ref url) => Ok(Arc::new(HttpContentLoader::new(url, config.timeout_secs)?)),
        None => Ok(Arc::new(FsContentLoader::new(&config.root))),
    }
}

/// Extract story paragraphs from an HTML page.
pub fn extract_story_text(html: &str, boilerplate: &[String]) -> Result<Vec<String>, ContentError> {
    let doc = Html::parse_document(html);

    let body = BODY_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|sel| doc.select(&sel).next())
        .ok_or(ContentError::NoStoryBody)?;

    let excluded = Selector::parse(EXCLUDED).ok();
    let mut text = String::new();
    collect_text(body, excluded.as_ref(), &mut text);

    let paragraphs: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !boilerplate.iter().any(|b| !b.is_empty() && line.contains(b.as_str())))
        .map(str::to_string)
        .collect();

    if paragraphs.is_empty() {
        return Err(ContentError::NoStoryBody);
    }
    Ok(paragraphs)
}

fn collect_text(element: ElementRef<'_>, excluded: Option<&Selector>, out: &mut String) {
    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if excluded.is_some_and(|sel| sel.matches(&child_el)) {
                continue;
            }
            let block = BLOCK_TAGS.contains(&child_el.value().name());
            if block {
                out.push('\n');
            }
            collect_text(child_el, excluded, out);
            if block {
                out.push('\n');
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

/// Where a story's content display stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContentState {
    Loading,
    Loaded { paragraphs: Vec<String> },
    /// The page was fetched but held no story text.
    Empty,
    Failed { message: String },
}

impl ContentState {
    /// UI label shown in place of the text, if any.
    pub fn label_key(&self) -> Option<&'static str> {
        match self {
            ContentState::Loading => Some(ui::STORY_LOADING),
            ContentState::Loaded { .. } => None,
            ContentState::Empty => Some(ui::STORY_EMPTY),
            ContentState::Failed { .. } => Some(ui::STORY_ERROR),
        }
    }
}

impl From<Result<Vec<String>, ContentError>> for ContentState {
    fn from(result: Result<Vec<String>, ContentError>) -> Self {
        match result {
            Ok(paragraphs) => ContentState::Loaded { paragraphs },
            Err(ContentError::NoStoryBody) => ContentState::Empty,
            Err(ContentError::Fetch(e)) => ContentState::Failed {
                message: e.to_string(),
            },
        }
    }
}

/// Fetch a story's page and extract its paragraphs.
pub async fn fetch_story_text(
    loader: &dyn ContentLoader,
    story: &Story,
    boilerplate: &[String],
) -> Result<Vec<String>, ContentError> {
    let html = loader.fetch(&story.file).await.map_err(|e| {
        tracing::warn!(id = %story.id, file = %story.file, error = %e, "story fetch failed");
        e
    })?;
    extract_story_text(&html, boilerplate)
}

pub async fn load_story_content(
    loader: &dyn ContentLoader,
    story: &Story,
    boilerplate: &[String],
) -> ContentState {
    fetch_story_text(loader, story, boilerplate).await.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kathalu_core::models::{Category, LengthBucket};

    fn boilerplate() -> Vec<String> {
        crate::config::ContentConfig::default().boilerplate
    }

    fn story(file: &str) -> Story {
        Story {
            id: "s".to_string(),
            file: file.to_string(),
            title: "కథ".to_string(),
            excerpt: "కథ".to_string(),
            year: 2020,
            text_length: 10,
            word_count: 2,
            categories: vec![Category::General],
            length: LengthBucket::Short,
            date: None,
        }
    }

    const PAGE: &str = r#"<html><head><title>కథ</title><style>p { color: red }</style></head>
<body>
  <nav class="nav"><a href="/">మొదటి పేజీ</a></nav>
  <main><div class="story-content">
    <h1>కథ - రవి కావూరు కథలు</h1>
    <div class="story-body">
      <p>మొదటి పేరా.</p>
      <p>రెండవ పేరా,
         అదే పేరా కొనసాగింపు.</p>
      <script>var x = 1;</script>
      <div class="story-tags"><span class="tag">family</span></div>
      <p>కథలు గురించి మరింత</p>
    </div>
  </div></main>
  <div class="footer">© 2024</div>
</body></html>"#;

    #[test]
    fn test_extracts_story_body_lines() {
        let paragraphs = extract_story_text(PAGE, &boilerplate()).unwrap();
        assert_eq!(
            paragraphs,
            vec!["మొదటి పేరా.", "రెండవ పేరా,", "అదే పేరా కొనసాగింపు."]
        );
    }

    #[test]
    fn test_falls_back_to_article() {
        let html = "<html><body><header class=\"header\">Site</header>\
                    <article><p>one</p><nav>menu</nav><p>two</p></article></body></html>";
        assert_eq!(extract_story_text(html, &[]).unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn test_story_content_fallback() {
        let html = "<div class=\"story-content\"><p>alpha</p><br>beta</div>";
        assert_eq!(extract_story_text(html, &[]).unwrap(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_missing_body_is_empty_not_error() {
        let err = extract_story_text("<html><body><p>loose</p></body></html>", &[]).unwrap_err();
        assert_eq!(err, ContentError::NoStoryBody);
        let state: ContentState = Result::<Vec<String>, _>::Err(err).into();
        assert_eq!(state, ContentState::Empty);
    }

    #[test]
    fn test_only_boilerplate_is_empty() {
        let html = "<div class=\"story-body\"><p>రవి కావూరు కథలు</p></div>";
        assert_eq!(
            extract_story_text(html, &boilerplate()),
            Err(ContentError::NoStoryBody)
        );
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(ContentState::Loading.label_key(), Some(ui::STORY_LOADING));
        assert_eq!(ContentState::Empty.label_key(), Some(ui::STORY_EMPTY));
        let failed: ContentState =
            Result::<Vec<String>, _>::Err(ContentError::from(FetchError::NotFound("x".into()))).into();
        assert_eq!(failed.label_key(), Some(ui::STORY_ERROR));
        assert_eq!(
            ContentState::Loaded { paragraphs: vec![] }.label_key(),
            None
        );
    }

    #[test]
    fn test_fs_loader_rejects_escaping_paths() {
        let loader = FsContentLoader::new("/srv/stories");
        assert!(matches!(loader.resolve("../etc/passwd"), Err(FetchError::InvalidPath(_))));
        assert!(matches!(loader.resolve("/etc/passwd"), Err(FetchError::InvalidPath(_))));
        assert_eq!(
            loader.resolve("2020/a.html").unwrap(),
            PathBuf::from("/srv/stories/2020/a.html")
        );
    }

    #[test]
    fn test_http_url_join() {
        let loader = HttpContentLoader::new("https://example.org/kathalu", 5).unwrap();
        assert_eq!(
            loader.url_for("/2020/a.html"),
            "https://example.org/kathalu/2020/a.html"
        );
    }

    #[tokio::test]
    async fn test_fs_loader_states() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("2020")).unwrap();
        std::fs::write(dir.path().join("2020/a.html"), PAGE).unwrap();
        std::fs::write(dir.path().join("2020/blank.html"), "<p>no body</p>").unwrap();
        let loader = FsContentLoader::new(dir.path());

        let loaded = load_story_content(&loader, &story("2020/a.html"), &boilerplate()).await;
        assert!(matches!(loaded, ContentState::Loaded { ref paragraphs } if paragraphs.len() == 3));

        let empty = load_story_content(&loader, &story("2020/blank.html"), &boilerplate()).await;
        assert_eq!(empty, ContentState::Empty);

        let missing = load_story_content(&loader, &story("2020/missing.html"), &boilerplate()).await;
        assert!(matches!(missing, ContentState::Failed { .. }));
    }
}
