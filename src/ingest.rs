//! Catalog ingestion: read a story data file and normalize it.
//!
//! Two source shapes are accepted and both are reduced to the canonical
//! [`Story`] record before anything else sees them:
//!
//! | Shape | Root | Per-record fields |
//! |-------|------|-------------------|
//! | `by_year` | object keyed by year | `title`, `file`, `text_length`, optional `excerpt` |
//! | `flat` | array | `title`, `filename`, `year`, `categories`, `excerpt`, `wordCount` |
//!
//! Records are normalized one at a time. A record that cannot produce a
//! story (no file reference, no derivable year, wrong field types) is
//! skipped and reported; it never aborts the load. A source that cannot be
//! read or is not valid JSON fails the whole load.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use kathalu_core::categorize::resolve_categories;
use kathalu_core::models::{estimate_word_count, Category, LengthBucket, Story};
use kathalu_core::CatalogStore;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::config::{CatalogShape, Config};

/// Site suffixes stripped from titles.
const TITLE_SUFFIXES: [&str; 2] = [" - రవి కావూరు కథలు", " - రవి గరి కథలు"];

/// A number that may arrive as an integer, a float, or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flexible {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Flexible {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Flexible::Int(n) => Some(*n),
            Flexible::Float(f) if f.is_finite() => Some(f.round() as i64),
            Flexible::Float(_) => None,
            Flexible::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f.round() as i64))
            }
        }
    }

    fn as_u32(&self) -> Option<u32> {
        self.as_i64().and_then(|n| u32::try_from(n.max(0)).ok())
    }
}

/// Story record as it appears in either source shape.
#[derive(Debug, Deserialize)]
struct RawStory {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    year: Option<Flexible>,
    #[serde(default, alias = "textLength")]
    text_length: Option<Flexible>,
    #[serde(default, rename = "wordCount")]
    word_count: Option<Flexible>,
    #[serde(default)]
    categories: Option<Vec<String>>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

/// Why a record was left out of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingFile,
    MissingYear,
    InvalidYearKey(String),
    Malformed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingFile => write!(f, "no file reference"),
            SkipReason::MissingYear => write!(f, "no year and none derivable from the file path"),
            SkipReason::InvalidYearKey(k) => write!(f, "year key '{}' is not a number", k),
            SkipReason::Malformed(e) => write!(f, "malformed record: {}", e),
        }
    }
}

/// A record that was skipped, with its location in the source.
#[derive(Debug, Clone)]
pub struct SkippedRecord {
    /// `[index]` for flat sources, `year[index]` for year-keyed sources.
    pub position: String,
    pub reason: SkipReason,
}

/// Result of a successful load.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub stories: Vec<Story>,
    pub skipped: Vec<SkippedRecord>,
    /// The shape actually used (never `Auto`).
    pub shape: CatalogShape,
}

/// Parse and normalize catalog JSON.
pub fn parse_catalog(json: &str, shape: CatalogShape) -> Result<LoadedCatalog> {
    let root: Value = serde_json::from_str(json).context("catalog is not valid JSON")?;

    let shape = match (shape, &root) {
        (CatalogShape::Auto, Value::Object(_)) => CatalogShape::ByYear,
        (CatalogShape::Auto, Value::Array(_)) => CatalogShape::Flat,
        (CatalogShape::Auto, _) => bail!("catalog root must be an object or an array"),
        (CatalogShape::ByYear, Value::Object(_)) | (CatalogShape::Flat, Value::Array(_)) => shape,
        (CatalogShape::ByYear, _) => bail!("catalog shape 'by_year' expects a JSON object root"),
        (CatalogShape::Flat, _) => bail!("catalog shape 'flat' expects a JSON array root"),
    };

    let mut stories = Vec::new();
    let mut skipped = Vec::new();

    match root {
        Value::Object(by_year) => {
            let mut years: Vec<(Option<i32>, String, Value)> = by_year
                .into_iter()
                .map(|(k, v)| (k.trim().parse::<i32>().ok(), k, v))
                .collect();
            // Numeric year order, like a browser iterating integer keys
            years.sort_by_key(|(y, _, _)| *y);

            for (year, key, records) in years {
                let records = match records {
                    Value::Array(r) => r,
                    _ => {
                        skipped.push(SkippedRecord {
                            position: key.clone(),
                            reason: SkipReason::Malformed("year entry is not an array".into()),
                        });
                        continue;
                    }
                };
                for (i, record) in records.into_iter().enumerate() {
                    let position = format!("{}[{}]", key, i);
                    let outcome = match year {
                        Some(y) => normalize_value(record, Some(y)),
                        None => Err(SkipReason::InvalidYearKey(key.clone())),
                    };
                    collect(outcome, position, &mut stories, &mut skipped);
                }
            }
        }
        Value::Array(records) => {
            for (i, record) in records.into_iter().enumerate() {
                let outcome = normalize_value(record, None);
                collect(outcome, format!("[{}]", i), &mut stories, &mut skipped);
            }
        }
        _ => unreachable!("root type checked above"),
    }

    dedup_ids(&mut stories);

    for s in &skipped {
        tracing::warn!(position = %s.position, reason = %s.reason, "skipped catalog record");
    }

    Ok(LoadedCatalog {
        stories,
        skipped,
        shape,
    })
}

fn collect(
    outcome: std::result::Result<Story, SkipReason>,
    position: String,
    stories: &mut Vec<Story>,
    skipped: &mut Vec<SkippedRecord>,
) {
    match outcome {
        Ok(story) => stories.push(story),
        Err(reason) => skipped.push(SkippedRecord { position, reason }),
    }
}

fn normalize_value(record: Value, year_hint: Option<i32>) -> std::result::Result<Story, SkipReason> {
    let raw: RawStory =
        serde_json::from_value(record).map_err(|e| SkipReason::Malformed(e.to_string()))?;
    normalize(raw, year_hint)
}

fn normalize(raw: RawStory, year_hint: Option<i32>) -> std::result::Result<Story, SkipReason> {
    let file = raw
        .file
        .or(raw.filename)
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .ok_or(SkipReason::MissingFile)?;

    let title = raw
        .title
        .map(|t| clean_title(&t))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| title_from_file(&file));

    let excerpt = raw
        .excerpt
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| title.clone());

    let year = year_hint
        .or_else(|| {
            raw.year
                .as_ref()
                .and_then(Flexible::as_i64)
                .and_then(|y| i32::try_from(y).ok())
        })
        .or_else(|| year_from_path(&file))
        .ok_or(SkipReason::MissingYear)?;

    let stored_words = raw.word_count.as_ref().and_then(Flexible::as_u32);
    let text_length = raw
        .text_length
        .as_ref()
        .and_then(Flexible::as_u32)
        .or(stored_words)
        .unwrap_or(0);
    let word_count = stored_words.unwrap_or_else(|| estimate_word_count(text_length));

    let mut stored_categories = Vec::new();
    let mut stored_length = None;
    let tags = raw.categories.into_iter().flatten().chain(raw.category);
    for tag in tags {
        if let Ok(c) = tag.parse::<Category>() {
            stored_categories.push(c);
        } else if let Ok(l) = tag.parse::<LengthBucket>() {
            stored_length.get_or_insert(l);
        } else {
            tracing::debug!(tag = %tag, file = %file, "ignoring unknown category tag");
        }
    }

    let categories = resolve_categories(&stored_categories, &title);
    let length = stored_length.unwrap_or_else(|| LengthBucket::from_length(text_length));

    let id = raw
        .id
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .unwrap_or_else(|| file_stem(&file));

    let date = raw
        .date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok());

    Ok(Story {
        id,
        file,
        title,
        excerpt,
        year,
        text_length,
        word_count,
        categories,
        length,
        date,
    })
}

/// Strip known site suffixes and surrounding whitespace from a title.
pub fn clean_title(title: &str) -> String {
    let mut t = title.trim().to_string();
    for suffix in TITLE_SUFFIXES {
        t = t.replace(suffix, "");
    }
    t.trim().to_string()
}

fn file_stem(file: &str) -> String {
    Path::new(file)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| file.to_string())
}

fn title_from_file(file: &str) -> String {
    file_stem(file).replace('-', " ")
}

/// First four-digit path component, e.g. `stories/2019/x.html` → 2019.
pub fn year_from_path(path: &str) -> Option<i32> {
    path.split(['/', '\\'])
        .find(|part| part.len() == 4 && part.chars().all(|c| c.is_ascii_digit()))
        .and_then(|part| part.parse().ok())
}

/// Make ids unique by suffixing repeats with `-2`, `-3`, ...
fn dedup_ids(stories: &mut [Story]) {
    let mut taken: HashSet<String> = stories.iter().map(|s| s.id.clone()).collect();
    let mut kept: HashSet<String> = HashSet::new();
    for story in stories.iter_mut() {
        if kept.insert(story.id.clone()) {
            continue;
        }
        let mut n = 2;
        let new_id = loop {
            let candidate = format!("{}-{}", story.id, n);
            if !taken.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        tracing::warn!(id = %story.id, new_id = %new_id, "duplicate story id");
        taken.insert(new_id.clone());
        kept.insert(new_id.clone());
        story.id = new_id;
    }
}

/// Read the catalog source: a local path or an `http(s)://` URL.
pub async fn read_source(source: &str, timeout_secs: u64) -> Result<String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        let resp = client
            .get(source)
            .send()
            .await
            .with_context(|| format!("Failed to fetch catalog: {}", source))?;
        if !resp.status().is_success() {
            bail!("Failed to fetch catalog {}: HTTP {}", source, resp.status());
        }
        Ok(resp.text().await?)
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("Failed to read catalog file: {}", source))
    }
}

/// Load and normalize the configured catalog.
pub async fn load_catalog(config: &Config) -> Result<LoadedCatalog> {
    let json = read_source(&config.catalog.source, config.content.timeout_secs).await?;
    let loaded = parse_catalog(&json, config.catalog.shape)
        .with_context(|| format!("Failed to parse catalog: {}", config.catalog.source))?;
    tracing::info!(
        stories = loaded.stories.len(),
        skipped = loaded.skipped.len(),
        shape = ?loaded.shape,
        "catalog loaded"
    );
    Ok(loaded)
}

/// Load the catalog into a store; on failure return an empty store and the error.
pub async fn load_store(config: &Config) -> (CatalogStore, Option<anyhow::Error>) {
    match load_catalog(config).await {
        Ok(loaded) => (
            CatalogStore::new(loaded.stories, config.browse.page_size),
            None,
        ),
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "catalog load failed");
            (CatalogStore::empty(config.browse.page_size), Some(e))
        }
    }
}
