//! Build a flat catalog from a directory of story pages.
//!
//! Walks `root` for HTML files, pulls a title, excerpt and length from each
//! page, and emits records in the flat (array) catalog shape so the result
//! can be fed straight back to `[catalog] source`.
//!
//! Title lookup order is `<title>`, first `<h1>`, first `<h2>`, then the
//! file name with dashes turned into spaces. The year comes from a
//! four-digit path component, falling back to the file's modification year.

use anyhow::{bail, Result};
use chrono::{DateTime, Datelike, Local};
use globset::{Glob, GlobSet, GlobSetBuilder};
use kathalu_core::categorize::categorize;
use kathalu_core::models::{LengthBucket, CHARS_PER_WORD};
use scraper::{Html, Selector};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::ingest::{clean_title, year_from_path};

const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub include_globs: Vec<String>,
    pub exclude_globs: Vec<String>,
    pub follow_symlinks: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include_globs: vec!["**/*.html".to_string()],
            exclude_globs: Vec::new(),
            follow_symlinks: false,
        }
    }
}

/// One scanned page, serialized in the flat catalog shape.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScannedStory {
    pub title: String,
    pub excerpt: String,
    #[serde(rename = "wordCount")]
    pub word_count: u32,
    pub text_length: u32,
    pub year: i32,
    pub date: String,
    pub filename: String,
    pub categories: Vec<String>,
}

pub fn scan_directory(root: &Path, options: &ScanOptions) -> Result<Vec<ScannedStory>> {
    if !root.is_dir() {
        bail!("Scan root does not exist or is not a directory: {}", root.display());
    }

    let include_set = build_globset(&options.include_globs)?;

    let mut excludes = vec![
        "**/.git/**".to_string(),
        "**/node_modules/**".to_string(),
        "index.html".to_string(),
    ];
    excludes.extend(options.exclude_globs.iter().cloned());
    let exclude_set = build_globset(&excludes)?;

    let mut stories = Vec::new();

    for entry in WalkDir::new(root).follow_links(options.follow_symlinks) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().replace('\\', "/");

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }

        match page_to_story(path, &rel_str) {
            Ok(story) => stories.push(story),
            Err(e) => tracing::warn!(file = %rel_str, error = %e, "skipping unreadable page"),
        }
    }

    stories.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| a.filename.cmp(&b.filename)));
    tracing::info!(root = %root.display(), pages = stories.len(), "scan complete");
    Ok(stories)
}

fn page_to_story(path: &Path, relative: &str) -> Result<ScannedStory> {
    let html = std::fs::read_to_string(path)?;
    let modified: DateTime<Local> = std::fs::metadata(path)?
        .modified()
        .map(DateTime::from)
        .unwrap_or_else(|_| Local::now());

    let doc = Html::parse_document(&html);

    let title = ["title", "h1", "h2"]
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|sel| {
            doc.select(&sel)
                .next()
                .map(|el| clean_title(&el.text().collect::<String>()))
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_else(|| title_from_path(path));

    let text = page_text(&doc);
    let text_length = text.chars().count() as u32;
    let excerpt = if text.chars().count() > EXCERPT_CHARS {
        format!("{}...", text.chars().take(EXCERPT_CHARS).collect::<String>())
    } else {
        text.clone()
    };

    let category = categorize(&title);
    let length = LengthBucket::from_length(text_length);

    Ok(ScannedStory {
        word_count: count_words(&text, text_length),
        excerpt,
        text_length,
        year: year_from_path(relative).unwrap_or_else(|| modified.year()),
        date: modified.format("%Y-%m-%d").to_string(),
        filename: relative.to_string(),
        categories: vec![category.key().to_string(), length.key().to_string()],
        title,
    })
}

/// Visible text of the page body as one whitespace-joined line.
fn page_text(doc: &Html) -> String {
    let body = Selector::parse("body")
        .ok()
        .and_then(|sel| doc.select(&sel).next())
        .unwrap_or_else(|| doc.root_element());
    let raw: String = body.text().collect::<Vec<_>>().join("\n");
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn count_words(text: &str, text_length: u32) -> u32 {
    let words = text.split_whitespace().count() as u32;
    if words == 0 {
        text_length / CHARS_PER_WORD
    } else {
        words
    }
}

fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace('-', " "))
        .unwrap_or_default()
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// CLI entry point: scan `dir` and write (or print) the flat catalog.
pub fn run_scan(dir: &Path, options: &ScanOptions, output: Option<&PathBuf>) -> Result<()> {
    let stories = scan_directory(dir, options)?;
    let json = serde_json::to_string_pretty(&stories)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            eprintln!("Wrote {} stories to {}", stories.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
