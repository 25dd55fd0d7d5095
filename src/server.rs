//! HTTP surface: locale-routed pages plus a small JSON API.
//!
//! Every request goes through the locale middleware first. Page routes
//! only ever see locale-qualified paths; `/api/*` is excluded from
//! routing and served as is.

use crate::i18n::{Dictionary, DictionaryLoader, Locale, LocaleRegistry};
use crate::routing::{alternates, locale_middleware, strip_locale, Alternate, LocalePipeline};
use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Supported locales
    pub registry: Arc<LocaleRegistry>,
    /// Dictionary cache shared by all requests
    pub loader: Arc<DictionaryLoader>,
    /// Locale routing applied to every request
    pub pipeline: Arc<LocalePipeline>,
}

impl AppState {
    pub fn new(
        registry: Arc<LocaleRegistry>,
        loader: Arc<DictionaryLoader>,
        pipeline: Arc<LocalePipeline>,
    ) -> Self {
        Self {
            registry,
            loader,
            pipeline,
        }
    }
}

/// Everything a page needs to render in one locale.
#[derive(Debug, Serialize)]
pub struct PageContext<'a> {
    pub locale: String,
    pub lang: String,
    pub label: String,
    /// Path without the locale segment
    pub path: String,
    pub title: String,
    pub alternates: Vec<Alternate>,
    pub messages: &'a Dictionary,
}

/// Create the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // API (excluded from locale routing)
        .route("/api/health", get(health))
        .route("/api/locales", get(list_locales))
        .route("/api/dictionaries/:locale", get(get_dictionary))
        .route("/api/i18n/metrics", get(get_metrics))
        // Pages
        .route("/", get(not_found))
        .route("/:lang", get(page))
        .route("/:lang/*rest", get(page))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.pipeline.clone(),
            locale_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_locales(State(state): State<AppState>) -> Json<Vec<Locale>> {
    Json(state.registry.all().to_vec())
}

async fn get_dictionary(State(state): State<AppState>, Path(locale): Path<String>) -> Response {
    match state.loader.load_with_fallback(&locale).await {
        Ok(dictionary) => Json(dictionary.as_ref()).into_response(),
        Err(e) => {
            error!("Failed to serve dictionary for '{}': {}", locale, e);
            dictionary_unavailable()
        }
    }
}

async fn get_metrics(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "loader": state.loader.metrics().report(),
        "cached_locales": state.loader.cached_locales(),
        "source": state.loader.source_description(),
    }))
}

async fn page(State(state): State<AppState>, uri: Uri) -> Response {
    let (locale, rest) = strip_locale(&state.registry, uri.path());
    let Some(locale) = locale else {
        return not_found().await.into_response();
    };

    let messages = match state.loader.load_with_fallback(locale.id()).await {
        Ok(messages) => messages,
        Err(e) => {
            error!("Failed to render {} in '{}': {}", uri.path(), locale.id(), e);
            return dictionary_unavailable();
        }
    };

    Json(PageContext {
        locale: locale.id().to_string(),
        lang: locale.lang().to_string(),
        label: locale.label().to_string(),
        path: rest.to_string(),
        title: messages.text_or_key("common.title").to_string(),
        alternates: alternates(&state.registry, uri.path()),
        messages: &messages,
    })
    .into_response()
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

fn dictionary_unavailable() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Translations are temporarily unavailable" })),
    )
        .into_response()
}
