//! # Kathalu Core
//!
//! Pure browsing logic for a static story catalog: data models,
//! title categorization, filtering, growing-prefix pagination, bilingual
//! label resolution, and the catalog store that ties them together.
//!
//! This crate performs no I/O. Loading data files, fetching story content,
//! and persisting preferences live in the `kathalu` application crate.
//!
//! ## Pipeline
//!
//! ```text
//! catalog ──▶ categorize ──▶ filter ──▶ paginate ──▶ presentation
//!                                                      ▲
//!                               labels ────────────────┘
//! ```

pub mod catalog;
pub mod categorize;
pub mod filter;
pub mod labels;
pub mod models;
pub mod paginate;

pub use catalog::{load_more_label, CatalogStore};
pub use categorize::categorize;
pub use filter::{apply_filters, FilterCriteria};
pub use labels::{LabelDomain, LabelTable};
pub use models::{Category, Language, LengthBucket, Story};
pub use paginate::{get_page, Paginator, DEFAULT_PAGE_SIZE};
