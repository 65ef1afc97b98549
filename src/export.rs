//! Export the normalized catalog as a flat JSON array.
//!
//! The output uses the flat catalog shape with every derived value written
//! out (categories, length bucket, word count), so it loads back to the same
//! stories without re-running categorization.

use anyhow::Result;
use kathalu_core::{CatalogStore, Story};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ExportRecord<'a> {
    id: &'a str,
    title: &'a str,
    excerpt: &'a str,
    filename: &'a str,
    year: i32,
    text_length: u32,
    #[serde(rename = "wordCount")]
    word_count: u32,
    categories: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
}

impl<'a> From<&'a Story> for ExportRecord<'a> {
    fn from(story: &'a Story) -> Self {
        let mut categories: Vec<&'static str> =
            story.categories.iter().map(|c| c.key()).collect();
        categories.push(story.length.key());
        Self {
            id: &story.id,
            title: &story.title,
            excerpt: &story.excerpt,
            filename: &story.file,
            year: story.year,
            text_length: story.text_length,
            word_count: story.word_count,
            categories,
            date: story.date.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

pub fn export_json(stories: &[Story]) -> Result<String> {
    let records: Vec<ExportRecord<'_>> = stories.iter().map(ExportRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Export the catalog.
///
/// If `output` is `Some`, writes to that file path. Otherwise writes
/// to stdout for piping.
pub fn run_export(store: &CatalogStore, output: Option<&Path>) -> Result<()> {
    let json = export_json(store.stories())?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &json)?;
            eprintln!("Exported {} stories to {}", store.len(), path.display());
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}
