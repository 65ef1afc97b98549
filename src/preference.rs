//! Language preference persistence.
//!
//! The display language is remembered under the key `preferredLanguage`.
//! Stores are simple string key-value maps; [`JsonFilePreferenceStore`]
//! keeps them in a small JSON object on disk, [`MemoryPreferenceStore`]
//! keeps them for the life of the process.
//!
//! A missing, unreadable, or unrecognised value means Telugu.

use anyhow::{Context, Result};
use kathalu_core::Language;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const LANGUAGE_KEY: &str = "preferredLanguage";

pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences stored as a flat JSON object, rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFilePreferenceStore {
    /// Open the store at `path`. A missing file starts empty; a corrupt one
    /// is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable preferences");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create preferences directory: {}", parent.display())
                })?;
            }
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))?;
        Ok(())
    }
}

/// The stored language, or Telugu.
pub fn load_language(store: &dyn PreferenceStore) -> Language {
    match store.get(LANGUAGE_KEY) {
        Ok(Some(value)) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %value, "unknown stored language, using te");
            Language::default()
        }),
        Ok(None) => Language::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read language preference");
            Language::default()
        }
    }
}

pub fn save_language(store: &mut dyn PreferenceStore, language: Language) -> Result<()> {
    store.set(LANGUAGE_KEY, language.code())
}

/// Flip the stored language, persist it, and return the new value.
pub fn toggle_language(store: &mut dyn PreferenceStore) -> Result<Language> {
    let next = load_language(store).toggled();
    save_language(store, next)?;
    Ok(next)
}
