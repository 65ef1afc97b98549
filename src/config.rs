//! TOML configuration parsing and validation.
//!
//! ```toml
//! [catalog]
//! source = "stories-data.json"   # local path or http(s) URL
//! shape = "auto"                 # auto | by_year | flat
//!
//! [content]
//! root = "."                     # where story files live locally
//! # base_url = "https://example.org/stories/"
//!
//! [browse]
//! page_size = 12
//!
//! [server]
//! bind = "127.0.0.1:7341"
//!
//! [preferences]
//! path = "data/preferences.json"
//!
//! [labels.en.ui]
//! readMore = "Open"
//! ```

use anyhow::{bail, Context, Result};
use kathalu_core::labels::{LabelDomain, LabelTable};
use kathalu_core::models::Language;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub browse: BrowseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
    /// Label overrides: language → domain → key → text.
    #[serde(default)]
    pub labels: HashMap<Language, HashMap<String, HashMap<String, String>>>,
}

/// Which input shape the catalog file uses.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CatalogShape {
    /// Detect from the JSON root: object → `by_year`, array → `flat`.
    #[default]
    Auto,
    /// `{ "2020": [ {title, file, text_length}, ... ] }`
    ByYear,
    /// `[ {title, filename, year, categories, excerpt, wordCount}, ... ]`
    Flat,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub source: String,
    #[serde(default)]
    pub shape: CatalogShape,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    #[serde(default = "default_content_root")]
    pub root: PathBuf,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Lines containing any of these strings are dropped from story text.
    #[serde(default = "default_boilerplate")]
    pub boilerplate: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_content_root(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
            boilerplate: default_boilerplate(),
        }
    }
}

fn default_content_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_boilerplate() -> Vec<String> {
    vec![
        "రవి కావూరు కథలు".to_string(),
        "మొదటి పేజీ".to_string(),
        "కథలు గురించి".to_string(),
    ]
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrowseConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    kathalu_core::DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7341".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct PreferencesConfig {
    #[serde(default = "default_preferences_path")]
    pub path: PathBuf,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: default_preferences_path(),
        }
    }
}

fn default_preferences_path() -> PathBuf {
    PathBuf::from("data/preferences.json")
}

impl Config {
    /// Defaults for commands that run without a config file.
    pub fn minimal() -> Self {
        Self {
            catalog: CatalogConfig {
                source: "stories-data.json".to_string(),
                shape: CatalogShape::Auto,
            },
            content: ContentConfig::default(),
            browse: BrowseConfig::default(),
            server: ServerConfig::default(),
            preferences: PreferencesConfig::default(),
            labels: HashMap::new(),
        }
    }

    /// Built-in labels with the configured overrides applied.
    pub fn label_table(&self) -> Result<LabelTable> {
        let mut table = LabelTable::builtin();
        for (lang, domains) in &self.labels {
            for (domain, entries) in domains {
                let domain: LabelDomain = domain
                    .parse()
                    .with_context(|| format!("invalid [labels.{}] section", lang))?;
                for (key, value) in entries {
                    table.insert(*lang, domain, key.clone(), value.clone());
                }
            }
        }
        Ok(table)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.catalog.source.trim().is_empty() {
        bail!("catalog.source must not be empty");
    }

    if config.browse.page_size == 0 {
        bail!("browse.page_size must be >= 1");
    }

    if config.content.timeout_secs == 0 {
        bail!("content.timeout_secs must be > 0");
    }

    if let Some(ref url) = config.content.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("content.base_url must be an http(s) URL, got '{}'", url);
        }
    }

    if config.server.bind.trim().is_empty() {
        bail!("server.bind must not be empty");
    }

    // Surface bad label domains at load time rather than on first render
    config.label_table()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kathalu_core::labels::ui;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let file = write_config("[catalog]\nsource = \"stories.json\"\n");
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.catalog.shape, CatalogShape::Auto);
        assert_eq!(cfg.browse.page_size, 12);
        assert_eq!(cfg.content.boilerplate.len(), 3);
        assert_eq!(cfg.server.bind, "127.0.0.1:7341");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let file = write_config("[catalog]\nsource = \"s.json\"\n[browse]\npage_size = 0\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_unknown_shape_rejected() {
        let file = write_config("[catalog]\nsource = \"s.json\"\nshape = \"nested\"\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_base_url_must_be_http() {
        let file = write_config(
            "[catalog]\nsource = \"s.json\"\n[content]\nbase_url = \"ftp://host/\"\n",
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_label_overrides() {
        let file = write_config(
            "[catalog]\nsource = \"s.json\"\n[labels.en.ui]\nreadMore = \"Open\"\n",
        );
        let cfg = load_config(file.path()).unwrap();
        let labels = cfg.label_table().unwrap();
        assert_eq!(labels.ui(ui::READ_MORE, Language::En), "Open");
        assert_eq!(labels.ui(ui::READ_MORE, Language::Te), "ఇక కథ లోకి");
    }

    #[test]
    fn test_bad_label_domain_rejected() {
        let file = write_config(
            "[catalog]\nsource = \"s.json\"\n[labels.en.sidebar]\nx = \"y\"\n",
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/kathalu.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
