use std::{any::Any, sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::error;

use crate::{
    config::{Config, Environment},
    handlers::{
        AppState, api_info, get_quote, get_random_quote, health, list_quotes, list_tags,
        quotes_by_author, quotes_by_date, quotes_by_length, quotes_by_tag, route_not_found,
        search_quotes,
    },
    middleware::{rate_limit_middleware, security_headers_middleware},
    rate_limiter::RateLimiter,
};

pub fn create_router(config: &Config, state: AppState, rate_limiter: Arc<RateLimiter>) -> Router {
    // Only the data routes are rate limited; `/` and `/health` stay open.
    let api_routes = Router::new()
        .route("/quote/random", get(get_random_quote))
        .route("/quote/{id}", get(get_quote))
        .route("/quotes", get(list_quotes))
        .route("/quotes/search", get(search_quotes))
        .route("/quotes/author/{name}", get(quotes_by_author))
        .route("/quotes/tag/{tag}", get(quotes_by_tag))
        .route("/quotes/date/{date}", get(quotes_by_date))
        .route("/quotes/length", get(quotes_by_length))
        .route("/tags", get(list_tags))
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let mut router = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health))
        .nest(&config.api_prefix, api_routes)
        .fallback(route_not_found);

    if config.security_headers {
        router = router.layer(middleware::from_fn(security_headers_middleware));
    }

    let environment = config.environment;
    // CatchPanic sits inside Trace so converted 500s still get logged
    router
        .layer(CatchPanicLayer::custom(
            move |panic: Box<dyn Any + Send + 'static>| internal_error_response(environment, panic),
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_response(
                    |response: &Response, latency: Duration, _span: &tracing::Span| {
                        tracing::info!(
                            "response latency: {:?}, status: {}",
                            latency,
                            response.status()
                        );
                    },
                ),
        )
        .with_state(state)
}

/// Renders an unhandled fault as the generic 500 body. The panic detail is
/// only exposed outside production.
fn internal_error_response(environment: Environment, panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic_detail(panic);
    error!("Unhandled panic in request handler: {}", detail);

    let message = if environment.is_production() {
        "Something went wrong!".to_string()
    } else {
        detail
    };
    let body = serde_json::json!({
        "error": "Internal server error",
        "message": message,
    });

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [("content-type", "application/json")],
        body.to_string(),
    )
        .into_response()
}

fn panic_detail(panic: Box<dyn Any + Send + 'static>) -> String {
    if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    }
}
