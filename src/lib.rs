//! # Kathalu
//!
//! Browse, filter, and read a static collection of Telugu short stories.
//!
//! Kathalu loads a story data file (either the year-keyed or the flat
//! shape), normalizes every record, and serves a filterable, paginated,
//! bilingual gallery through a CLI and a JSON HTTP API. Full story text is
//! fetched on demand from the story pages themselves.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────────────┐
//! │ stories.json │──▶│    ingest    │──▶│ kathalu-core         │
//! │ (file / URL) │   │  normalize   │   │ filter · paginate ·  │
//! └──────────────┘   └──────────────┘   │ labels · catalog     │
//!                                       └─────────┬────────────┘
//! ┌──────────────┐   ┌──────────────┐             │
//! │ story pages  │──▶│   content    │──┐   ┌──────┴─────┐
//! │ (dir / URL)  │   │   extract    │  └──▶│ CLI · HTTP │
//! └──────────────┘   └──────────────┘      └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! kathalu scan ./stories --output stories-data.json   # build a catalog
//! kathalu list --category travel --length short       # browse
//! kathalu show kasi-yatra                             # read one story
//! kathalu lang toggle                                 # switch te ⇄ en
//! kathalu serve                                       # start HTTP API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`ingest`] | Catalog loading and normalization |
//! | [`content`] | Story page fetching and text extraction |
//! | [`preference`] | Language preference persistence |
//! | [`browse`] | Gallery and facet views |
//! | [`show`] | Single-story view |
//! | [`stats`] | Catalog statistics |
//! | [`export`] | Canonical flat export |
//! | [`scan`] | Catalog generation from story pages |
//! | [`server`] | HTTP API |

pub mod browse;
pub mod config;
pub mod content;
pub mod export;
pub mod ingest;
pub mod preference;
pub mod scan;
pub mod server;
pub mod show;
pub mod stats;
