//! HTTP API for browsing the catalog.
//!
//! Serves the same gallery, facet, and story views as the CLI, as JSON.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (version, story count, load error) |
//! | `GET`  | `/stories` | Filtered, paginated story cards |
//! | `GET`  | `/stories/{id}` | One story card |
//! | `GET`  | `/stories/{id}/content` | Story card plus extracted text |
//! | `GET`  | `/facets` | Year, category and length filter options |
//! | `GET`  | `/labels` | All labels for a language |
//! | `GET`  | `/preferences/language` | Stored display language |
//! | `PUT`  | `/preferences/language` | Set (`te`, `en`) or `toggle` the language |
//!
//! `GET /stories` takes `year`, `category`, `length`, `q`, `page` and `lang`
//! query parameters. Empty values and `all` leave a dimension unconstrained;
//! `page` selects how many pages of the growing prefix are returned. Every
//! read endpoint accepts `lang`; without it the stored preference is used.
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "unknown category: 'horror'" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `content_error` (502),
//! `internal` (500).
//!
//! # Concurrency
//!
//! The catalog is loaded once and shared read-only. The preference store is
//! the only mutable state and sits behind a read-write lock.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use kathalu_core::labels::LabelDomain;
use kathalu_core::{CatalogStore, LabelTable, Language, Paginator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use crate::browse::{BrowsePage, FacetsView, FilterParams, StoryCard};
use crate::config::Config;
use crate::content::{loader_from_config, ContentLoader, ContentState};
use crate::ingest::load_store;
use crate::preference::{load_language, save_language, JsonFilePreferenceStore, PreferenceStore};
use crate::show::{show_story, StoryView};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    catalog: Arc<CatalogStore>,
    /// Set when the catalog failed to load and the server runs with an empty one.
    catalog_error: Option<Arc<str>>,
    labels: Arc<LabelTable>,
    loader: Arc<dyn ContentLoader>,
    preferences: Arc<RwLock<Box<dyn PreferenceStore>>>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: CatalogStore,
        catalog_error: Option<String>,
        loader: Arc<dyn ContentLoader>,
        preferences: Box<dyn PreferenceStore>,
    ) -> anyhow::Result<Self> {
        let labels = config.label_table()?;
        Ok(Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            catalog_error: catalog_error.map(Arc::from),
            labels: Arc::new(labels),
            loader,
            preferences: Arc::new(RwLock::new(preferences)),
        })
    }

    async fn language(&self, requested: Option<&str>) -> Result<Language, AppError> {
        match requested.map(str::trim).filter(|l| !l.is_empty()) {
            Some(lang) => lang.parse().map_err(|e: kathalu_core::models::ParseTagError| {
                bad_request(e.to_string())
            }),
            None => {
                let prefs = self.preferences.read().await;
                Ok(load_language(&**prefs))
            }
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/stories", get(handle_list_stories))
        .route("/stories/{id}", get(handle_get_story))
        .route("/stories/{id}/content", get(handle_story_content))
        .route("/facets", get(handle_facets))
        .route("/labels", get(handle_labels))
        .route(
            "/preferences/language",
            get(handle_get_language).put(handle_set_language),
        )
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP server.
///
/// Loads the catalog (falling back to an empty one if that fails), opens
/// the preference file, and binds to `[server].bind`. Runs until the
/// process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();

    let (catalog, load_error) = load_store(config).await;
    let loader = loader_from_config(&config.content)?;
    let preferences = JsonFilePreferenceStore::open(&config.preferences.path);

    println!("Loaded {} stories from {}", catalog.len(), config.catalog.source);
    if let Some(ref e) = load_error {
        eprintln!("Warning: catalog failed to load, serving an empty catalog: {:#}", e);
    }

    let state = AppState::new(
        config.clone(),
        catalog,
        load_error.map(|e| format!("{:#}", e)),
        loader,
        Box::new(preferences),
    )?;

    let app = router(state);

    println!("Kathalu server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

/// Story page could not be fetched.
fn content_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_GATEWAY,
        code: "content_error".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    stories: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    catalog_error: Option<String>,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        stories: state.catalog.len(),
        catalog_error: state.catalog_error.as_deref().map(str::to_string),
    })
}

// ============ GET /stories ============

#[derive(Debug, Default, Deserialize)]
struct StoriesQuery {
    #[serde(flatten)]
    filters: FilterParams,
    #[serde(default)]
    page: Option<String>,
    #[serde(default)]
    lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LangQuery {
    #[serde(default)]
    lang: Option<String>,
}

fn parse_page(page: Option<&str>) -> Result<usize, AppError> {
    match page.map(str::trim).filter(|p| !p.is_empty()) {
        None => Ok(1),
        Some(p) => match p.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(bad_request(format!("page must be a positive integer, got '{}'", p))),
        },
    }
}

async fn handle_list_stories(
    State(state): State<AppState>,
    Query(query): Query<StoriesQuery>,
) -> Result<Json<BrowsePage>, AppError> {
    let criteria = query
        .filters
        .to_criteria()
        .map_err(|e| bad_request(format!("{:#}", e)))?;
    let page = parse_page(query.page.as_deref())?;
    let lang = state.language(query.lang.as_deref()).await?;

    let filtered = kathalu_core::apply_filters(state.catalog.stories(), &criteria);
    let mut paginator = Paginator::new(state.config.browse.page_size);
    paginator.set_page(page);

    Ok(Json(BrowsePage::new(
        &filtered,
        &paginator,
        state.catalog.len(),
        lang,
        &state.labels,
    )))
}

// ============ GET /stories/{id} ============

async fn handle_get_story(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<Json<StoryCard>, AppError> {
    let lang = state.language(query.lang.as_deref()).await?;
    let story = state
        .catalog
        .find(&id)
        .ok_or_else(|| not_found(format!("story not found: {}", id)))?;
    Ok(Json(StoryCard::new(story, &state.labels, lang)))
}

// ============ GET /stories/{id}/content ============

async fn handle_story_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<Json<StoryView>, AppError> {
    let lang = state.language(query.lang.as_deref()).await?;
    if state.catalog.find(&id).is_none() {
        return Err(not_found(format!("story not found: {}", id)));
    }

    let view = show_story(
        &state.config,
        &state.catalog,
        state.loader.as_ref(),
        &state.labels,
        &id,
        lang,
    )
    .await
    .map_err(|e| internal(format!("{:#}", e)))?;

    if let ContentState::Failed { ref message } = view.content {
        return Err(content_error(message.clone()));
    }
    Ok(Json(view))
}

// ============ GET /facets ============

async fn handle_facets(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Result<Json<FacetsView>, AppError> {
    let lang = state.language(query.lang.as_deref()).await?;
    Ok(Json(FacetsView::new(
        &state.catalog.facets(),
        &state.labels,
        lang,
    )))
}

// ============ GET /labels ============

#[derive(Serialize)]
struct LabelsResponse {
    language: Language,
    labels: BTreeMap<&'static str, BTreeMap<String, String>>,
}

async fn handle_labels(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Result<Json<LabelsResponse>, AppError> {
    let lang = state.language(query.lang.as_deref()).await?;
    let labels: BTreeMap<_, _> = LabelDomain::ALL
        .iter()
        .map(|&domain| {
            let entries: BTreeMap<String, String> =
                state.labels.domain_labels(domain, lang).into_iter().collect();
            (domain.key(), entries)
        })
        .collect();
    Ok(Json(LabelsResponse {
        language: lang,
        labels,
    }))
}

// ============ /preferences/language ============

#[derive(Serialize)]
struct LanguageResponse {
    language: Language,
}

#[derive(Deserialize)]
struct SetLanguageRequest {
    /// `te`, `en`, or `toggle`.
    language: String,
}

async fn handle_get_language(State(state): State<AppState>) -> Json<LanguageResponse> {
    let prefs = state.preferences.read().await;
    Json(LanguageResponse {
        language: load_language(&**prefs),
    })
}

async fn handle_set_language(
    State(state): State<AppState>,
    Json(req): Json<SetLanguageRequest>,
) -> Result<Json<LanguageResponse>, AppError> {
    let mut prefs = state.preferences.write().await;
    let language = if req.language.trim().eq_ignore_ascii_case("toggle") {
        load_language(&**prefs).toggled()
    } else {
        req.language
            .parse::<Language>()
            .map_err(|e| bad_request(e.to_string()))?
    };
    save_language(&mut **prefs, language).map_err(|e| internal(format!("{:#}", e)))?;
    tracing::info!(language = %language, "language preference updated");
    Ok(Json(LanguageResponse { language }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::MemoryPreferenceStore;

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None).unwrap(), 1);
        assert_eq!(parse_page(Some(" ")).unwrap(), 1);
        assert_eq!(parse_page(Some("3")).unwrap(), 3);
        assert!(parse_page(Some("0")).is_err());
        assert!(parse_page(Some("two")).is_err());
    }

    #[tokio::test]
    async fn test_language_resolution() {
        let mut prefs = MemoryPreferenceStore::new();
        save_language(&mut prefs, Language::En).unwrap();
        let state = AppState::new(
            Config::minimal(),
            CatalogStore::empty(12),
            None,
            Arc::new(crate::content::FsContentLoader::new(".")),
            Box::new(prefs),
        )
        .unwrap();

        assert_eq!(state.language(None).await.unwrap(), Language::En);
        assert_eq!(state.language(Some("te")).await.unwrap(), Language::Te);
        let err = state.language(Some("fr")).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
