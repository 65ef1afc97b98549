//! Catalog statistics.
//!
//! A quick summary of what was loaded: totals, stories per year (newest
//! first), per primary category (in priority order) and per length bucket.
//! Used by `kathalu stats` to sanity-check a data file after editing or
//! rescanning it.

use anyhow::Result;
use kathalu_core::{Category, CatalogStore, LengthBucket, Story};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::Config;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogStats {
    pub total: usize,
    pub total_words: u64,
    pub by_year: Vec<(i32, usize)>,
    pub by_category: Vec<(Category, usize)>,
    pub by_length: Vec<(LengthBucket, usize)>,
}

pub fn compute_stats(stories: &[Story]) -> CatalogStats {
    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    let mut categories: BTreeMap<Category, usize> = BTreeMap::new();
    let mut lengths: BTreeMap<LengthBucket, usize> = BTreeMap::new();

    for story in stories {
        *years.entry(story.year).or_default() += 1;
        *categories.entry(story.primary_category()).or_default() += 1;
        *lengths.entry(story.length).or_default() += 1;
    }

    CatalogStats {
        total: stories.len(),
        total_words: stories.iter().map(|s| u64::from(s.word_count)).sum(),
        by_year: years.into_iter().rev().collect(),
        by_category: categories.into_iter().collect(),
        by_length: lengths.into_iter().collect(),
    }
}

/// Run the stats command and print a summary.
pub fn run_stats(config: &Config, store: &CatalogStore, json: bool) -> Result<()> {
    let stats = compute_stats(store.stories());

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let labels = config.label_table()?;
    let lang = store.language();

    println!("Kathalu — Catalog Stats");
    println!("=======================");
    println!();
    println!("  Source:      {}", config.catalog.source);
    println!("  Stories:     {}", stats.total);
    println!("  Words:       {}", stats.total_words);

    if stats.total == 0 {
        println!();
        return Ok(());
    }

    println!();
    println!("  By year:");
    for (year, count) in &stats.by_year {
        println!("    {:<20} {:>6}", year, count);
    }

    println!();
    println!("  By category:");
    for (category, count) in &stats.by_category {
        println!(
            "    {:<20} {:>6}   {}",
            category.key(),
            count,
            labels.category_name(*category, lang)
        );
    }

    println!();
    println!("  By length:");
    for (length, count) in &stats.by_length {
        println!(
            "    {:<20} {:>6}   {}",
            length.key(),
            count,
            labels.length_name(*length, lang)
        );
    }
    println!();

    Ok(())
}
