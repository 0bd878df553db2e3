use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use section_core::{DocumentRecord, SearchConfig, SearchContext, Suggestion};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const MAX_K: usize = 100;
const SNIPPET_WINDOW: usize = 150;
const SNIPPET_FALLBACK_CHARS: usize = 300;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub k: Option<usize>,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub top_k: Option<usize>,
}

#[derive(Deserialize)]
pub struct AutocompleteParams {
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub group: String,
    pub score: f32,
    pub snippet: String,
}

#[derive(Serialize)]
pub struct SuggestionItem {
    pub id: String,
    pub title: String,
}

impl From<Suggestion<'_>> for SuggestionItem {
    fn from(s: Suggestion<'_>) -> Self {
        Self { id: s.id.to_string(), title: s.title.to_string() }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<SearchContext>,
}

/// Load the corpus, build the index and wire up the routes.
pub fn build_app(corpus: &str, config: SearchConfig) -> Result<Router> {
    let ctx = SearchContext::load(corpus, config)?;
    Ok(router(Arc::new(ctx)))
}

pub fn router(ctx: Arc<SearchContext>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler).post(search_post_handler))
        .route("/autocomplete", get(autocomplete_handler))
        .route("/section/:id", get(section_handler))
        .with_state(AppState { ctx })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    Json(run_search(&state, params.q, params.k))
}

pub async fn search_post_handler(State(state): State<AppState>, Json(req): Json<SearchRequest>) -> Json<SearchResponse> {
    Json(run_search(&state, req.query, req.top_k))
}

fn run_search(state: &AppState, query: String, k: Option<usize>) -> SearchResponse {
    let start = std::time::Instant::now();
    let k = k.unwrap_or(state.ctx.config().default_top_k).clamp(1, MAX_K);
    let hits = state.ctx.search(&query, k);
    let results: Vec<SearchHit> = hits
        .into_iter()
        .map(|h| SearchHit {
            id: h.record.id.clone(),
            title: h.record.title.clone(),
            group: h.record.group.clone(),
            score: h.score,
            snippet: make_snippet(&h.record.body, query.trim()),
        })
        .collect();
    let elapsed = start.elapsed();
    tracing::info!(query = %query, hits = results.len(), took_s = elapsed.as_secs_f64(), "search");
    SearchResponse { query, took_s: elapsed.as_secs_f64(), total_hits: results.len(), results }
}

pub async fn autocomplete_handler(State(state): State<AppState>, Query(params): Query<AutocompleteParams>) -> Json<Vec<SuggestionItem>> {
    let limit = params.limit.unwrap_or(state.ctx.config().default_autocomplete_limit).min(MAX_K);
    let items = state
        .ctx
        .autocomplete(&params.q, limit)
        .into_iter()
        .map(SuggestionItem::from)
        .collect();
    Json(items)
}

pub async fn section_handler(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<DocumentRecord>, (StatusCode, Json<serde_json::Value>)> {
    match state.ctx.get_by_id(&id) {
        Some(record) => Ok(Json(record.clone())),
        None => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" })))),
    }
}

/// Window of text around the first case-insensitive occurrence of `query`,
/// or the leading text when it does not occur.
pub fn make_snippet(text: &str, query: &str) -> String {
    match find_case_insensitive(text, query) {
        Some(idx) if !query.is_empty() => {
            let start = floor_boundary(text, idx.saturating_sub(SNIPPET_WINDOW));
            let end = ceil_boundary(text, (idx + SNIPPET_WINDOW).min(text.len()));
            format!("...{}...", &text[start..end])
        }
        _ => {
            let head: String = text.chars().take(SNIPPET_FALLBACK_CHARS).collect();
            format!("{head}...")
        }
    }
}

/// Byte offset in `haystack` where `needle` starts, ignoring case.
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let n: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if n.is_empty() { return None; }
    haystack.char_indices().map(|(i, _)| i).find(|&i| {
        let mut h = haystack[i..].chars().flat_map(char::to_lowercase);
        n.iter().all(|c| h.next() == Some(*c))
    })
}

fn floor_boundary(s: &str, mut i: usize) -> usize {
    while !s.is_char_boundary(i) { i -= 1; }
    i
}

fn ceil_boundary(s: &str, mut i: usize) -> usize {
    while !s.is_char_boundary(i) { i += 1; }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_centres_on_match() {
        let text = format!("{}murder{}", "a".repeat(200), "b".repeat(200));
        let s = make_snippet(&text, "MURDER");
        assert!(s.starts_with("...") && s.ends_with("..."));
        assert!(s.contains("murder"));
        assert_eq!(s.len(), 3 + 300 + 3);
    }

    #[test]
    fn snippet_falls_back_to_leading_text() {
        let text = "x".repeat(400);
        assert_eq!(make_snippet(&text, "theft"), format!("{}...", "x".repeat(300)));
        assert_eq!(make_snippet("short", "theft"), "short...");
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let text = format!("{}theft{}", "é".repeat(120), "ü".repeat(120));
        let s = make_snippet(&text, "Theft");
        assert!(s.contains("theft"));
    }

    #[test]
    fn finds_case_insensitive_offsets() {
        assert_eq!(find_case_insensitive("Punishment for Theft", "theft"), Some(15));
        assert_eq!(find_case_insensitive("abc", "zz"), None);
        assert_eq!(find_case_insensitive("abc", ""), None);
    }
}
