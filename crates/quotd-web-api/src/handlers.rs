use std::{
    fmt::Display,
    sync::{Arc, Mutex},
    time::Instant,
};

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode, Uri},
    response::Response,
};
use rand::rngs::StdRng;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

use quotd_core::{QuoteStore, query};

use crate::{
    config::{Config, Environment},
    error::ApiError,
    response::json_response,
};

/// Shared per-request context: the immutable quote collection, the process
/// RNG and the bits of configuration that shape responses. Everything is
/// handed to handlers explicitly; there is no ambient global state.
#[derive(Clone)]
pub struct AppState {
    store: Arc<QuoteStore>,
    rng: Arc<Mutex<StdRng>>,
    started_at: Instant,
    environment: Environment,
    api_prefix: Arc<str>,
    api_version: Arc<str>,
    pretty_json: bool,
}

impl AppState {
    pub fn new(config: &Config, store: QuoteStore, rng: StdRng) -> Self {
        Self {
            store: Arc::new(store),
            rng: Arc::new(Mutex::new(rng)),
            started_at: Instant::now(),
            environment: config.environment,
            api_prefix: config.api_prefix.as_str().into(),
            api_version: config.api_version.as_str().into(),
            // Pretty output is a development convenience only
            pretty_json: config.pretty_json && !config.environment.is_production(),
        }
    }

    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    fn json<T: serde::Serialize>(&self, value: &T) -> Response {
        self.json_with_status(StatusCode::OK, value)
    }

    fn json_with_status<T: serde::Serialize>(&self, status: StatusCode, value: &T) -> Response {
        json_response(status, value, self.pretty_json)
    }

    /// Logs the fault and builds the client-facing internal error, with the
    /// detail exposed only outside production.
    fn internal(&self, detail: impl Display) -> ApiError {
        error!("Internal error: {}", detail);
        if self.environment.is_production() {
            ApiError::Internal("Something went wrong!".to_string())
        } else {
            ApiError::Internal(detail.to_string())
        }
    }
}

#[derive(Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct LengthParams {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

pub async fn get_random_quote(State(state): State<AppState>) -> Result<Response, ApiError> {
    let mut rng = state
        .rng
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    match query::random(state.store.all(), &mut *rng) {
        Some(quote) => {
            debug!("Picked random quote: {}", quote.id);
            Ok(state.json(quote))
        }
        None => Err(state.internal("quote collection is empty")),
    }
}

pub async fn list_quotes(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Response {
    let page = query::paginate(state.store.all(), params.page, params.limit);
    debug!(
        "Listing quotes page {} limit {} ({} results)",
        page.page,
        page.limit,
        page.results.len()
    );
    state.json(&page)
}

pub async fn search_quotes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let q = params
        .q
        .filter(|q| !q.is_empty())
        .ok_or(ApiError::MissingSearchQuery)?;

    let results = query::search(state.store.all(), &q);
    info!("Search for '{}' matched {} quotes", q, results.total);
    Ok(state.json(&results))
}

pub async fn quotes_by_author(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    let results = query::by_author(state.store.all(), &name);
    debug!("Author filter '{}' matched {} quotes", name, results.total);
    state.json(&results)
}

pub async fn quotes_by_tag(State(state): State<AppState>, Path(tag): Path<String>) -> Response {
    let results = query::by_tag(state.store.all(), &tag);
    debug!("Tag filter '{}' matched {} quotes", tag, results.total);
    state.json(&results)
}

pub async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match query::by_id(state.store.all(), &id) {
        Some(quote) => Ok(state.json(quote)),
        None => {
            debug!("Quote '{}' not found", id);
            Err(ApiError::QuoteNotFound)
        }
    }
}

pub async fn quotes_by_date(State(state): State<AppState>, Path(date): Path<String>) -> Response {
    let results = query::by_date(state.store.all(), &date);
    debug!("Date filter '{}' matched {} quotes", date, results.total);
    state.json(&results)
}

pub async fn quotes_by_length(
    State(state): State<AppState>,
    Query(params): Query<LengthParams>,
) -> Response {
    let results = query::by_length(state.store.all(), params.min, params.max);
    debug!(
        "Length filter {:?}..{:?} matched {} quotes",
        params.min, params.max, results.total
    );
    state.json(&results)
}

pub async fn list_tags(State(state): State<AppState>) -> Response {
    let tags = query::all_tags(state.store.all());
    debug!("Listing {} tags", tags.total);
    state.json(&tags)
}

/// `GET /` — machine-readable documentation of the API surface.
pub async fn api_info(State(state): State<AppState>) -> Response {
    let prefix = state.api_prefix.as_ref();
    let body = json!({
        "name": "Quote API",
        "version": state.api_version.as_ref(),
        "description": "A lightweight API serving a fixed collection of quotes",
        "totalQuotes": state.store.len(),
        "endpoints": {
            "random": format!("GET {prefix}/quote/random"),
            "list": format!("GET {prefix}/quotes?page=1&limit=10"),
            "search": format!("GET {prefix}/quotes/search?q=keyword"),
            "byAuthor": format!("GET {prefix}/quotes/author/{{name}}"),
            "byTag": format!("GET {prefix}/quotes/tag/{{tag}}"),
            "byId": format!("GET {prefix}/quote/{{id}}"),
            "byDate": format!("GET {prefix}/quotes/date/{{date}}"),
            "byLength": format!("GET {prefix}/quotes/length?min=0&max=100"),
            "tags": format!("GET {prefix}/tags"),
            "health": "GET /health",
        },
    });
    state.json(&body)
}

pub async fn health(State(state): State<AppState>) -> Response {
    let body = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime": state.started_at.elapsed().as_secs_f64(),
        "environment": state.environment.as_str(),
        "version": state.api_version.as_ref(),
    });
    state.json(&body)
}

/// Fallback for anything the router does not know, answering with the full
/// route listing so the caller can self-correct.
pub async fn route_not_found(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Response {
    debug!("Unmatched route: {} {}", method, uri.path());
    let body = json!({
        "error": "Route not found",
        "message": format!("The requested route {} {} does not exist.", method, uri.path()),
        "availableRoutes": available_routes(&state.api_prefix),
    });
    state.json_with_status(StatusCode::NOT_FOUND, &body)
}

pub fn available_routes(prefix: &str) -> Vec<String> {
    vec![
        "GET /".to_string(),
        format!("GET {prefix}/quote/random"),
        format!("GET {prefix}/quotes"),
        format!("GET {prefix}/quotes/search"),
        format!("GET {prefix}/quotes/author/{{name}}"),
        format!("GET {prefix}/quotes/tag/{{tag}}"),
        format!("GET {prefix}/quote/{{id}}"),
        format!("GET {prefix}/quotes/date/{{date}}"),
        format!("GET {prefix}/quotes/length"),
        format!("GET {prefix}/tags"),
        "GET /health".to_string(),
    ]
}
