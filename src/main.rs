//! # Kathalu CLI (`kathalu`)
//!
//! Browse and read a static Telugu story collection from the terminal, or
//! serve it as a JSON API.
//!
//! ## Usage
//!
//! ```bash
//! kathalu --config ./config/kathalu.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `kathalu list` | Filtered, paginated story gallery |
//! | `kathalu show <id>` | One story with its full text |
//! | `kathalu facets` | Available years, categories and lengths |
//! | `kathalu stats` | Story counts by year, category and length |
//! | `kathalu export` | Write the normalized catalog as flat JSON |
//! | `kathalu scan <dir>` | Build a catalog from a directory of story pages |
//! | `kathalu lang [te\|en\|toggle]` | Show or change the display language |
//! | `kathalu serve` | Start the HTTP server |
//!
//! Diagnostics go to stderr and are controlled with `RUST_LOG`
//! (default `warn`).

use clap::{Parser, Subcommand};
use kathalu::config::{self, Config};
use kathalu::preference::{self, JsonFilePreferenceStore};
use kathalu::{browse, content, export, ingest, scan, server, show, stats};
use kathalu_core::labels::ui;
use kathalu_core::{CatalogStore, Language};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Kathalu — browse, filter, and read a static Telugu story collection.
///
/// All commands except `scan` read a TOML configuration file given with
/// `--config`. See `config/kathalu.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "kathalu",
    about = "Kathalu — browse, filter, and read a static Telugu story collection",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/kathalu.toml")]
    config: PathBuf,

    /// Display language for labels (te or en). Defaults to the stored preference.
    #[arg(long, global = true)]
    lang: Option<Language>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stories matching the given filters.
    ///
    /// Filters combine with AND. `--page N` shows the first N pages, the
    /// same prefix a reader sees after pressing "load more" N-1 times.
    List {
        #[command(flatten)]
        filters: browse::FilterParams,

        /// Number of pages to show.
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Show one story and load its full text.
    Show {
        /// Story ID (the file stem unless the catalog sets one).
        id: String,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List the filter options present in the catalog.
    Facets {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Show catalog statistics.
    Stats {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Export the normalized catalog as a flat JSON array.
    Export {
        /// Output file path. Defaults to stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Build a flat catalog from a directory of HTML story pages.
    Scan {
        /// Directory to walk.
        dir: PathBuf,

        /// Glob of files to include (repeatable). Defaults to `**/*.html`.
        #[arg(long)]
        include: Vec<String>,

        /// Glob of files to skip (repeatable).
        #[arg(long)]
        exclude: Vec<String>,

        /// Output file path. Defaults to stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show or change the stored display language.
    Lang {
        /// `te`, `en`, or `toggle`. Omit to print the current language.
        value: Option<String>,
    },

    /// Start the HTTP server.
    Serve,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load the catalog, reporting a failure and continuing with an empty one.
async fn open_store(cfg: &Config, lang: Language) -> anyhow::Result<CatalogStore> {
    let (mut store, error) = ingest::load_store(cfg).await;
    store.set_language(lang);
    if let Some(e) = error {
        let labels = cfg.label_table()?;
        eprintln!("{}", labels.ui(ui::CATALOG_ERROR, lang));
        eprintln!("Error: {:#}", e);
    }
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Scan {
        dir,
        include,
        exclude,
        output,
    } = &cli.command
    {
        let mut options = scan::ScanOptions::default();
        if !include.is_empty() {
            options.include_globs = include.clone();
        }
        options.exclude_globs = exclude.clone();
        scan::run_scan(dir, &options, output.as_ref())?;
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    let lang = match cli.lang {
        Some(lang) => lang,
        None => preference::load_language(&JsonFilePreferenceStore::open(&cfg.preferences.path)),
    };

    match cli.command {
        Commands::List {
            filters,
            page,
            json,
        } => {
            let mut store = open_store(&cfg, lang).await?;
            browse::run_list(&cfg, &mut store, &filters, page, json)?;
        }
        Commands::Show { id, json } => {
            let store = open_store(&cfg, lang).await?;
            let loader = content::loader_from_config(&cfg.content)?;
            show::run_show(&cfg, &store, loader.as_ref(), &id, json).await?;
        }
        Commands::Facets { json } => {
            let store = open_store(&cfg, lang).await?;
            browse::run_facets(&cfg, &store, json)?;
        }
        Commands::Stats { json } => {
            let store = open_store(&cfg, lang).await?;
            stats::run_stats(&cfg, &store, json)?;
        }
        Commands::Export { output } => {
            let loaded = ingest::load_catalog(&cfg).await?;
            let store = CatalogStore::new(loaded.stories, cfg.browse.page_size);
            export::run_export(&store, output.as_deref())?;
        }
        Commands::Lang { value } => {
            let mut store = JsonFilePreferenceStore::open(&cfg.preferences.path);
            let language = match value.as_deref().map(str::trim) {
                None => preference::load_language(&store),
                Some("toggle") => preference::toggle_language(&mut store)?,
                Some(v) => {
                    let language: Language = v.parse()?;
                    preference::save_language(&mut store, language)?;
                    language
                }
            };
            println!("{}", language);
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Scan { .. } => unreachable!("handled before config load"),
    }

    Ok(())
}
