use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::rate_limiter::{RateLimitError, RateLimiter};

pub async fn rate_limit_middleware(
    State(rate_limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let identifier = extract_identifier(&request);

    match rate_limiter.check_and_increment(&identifier) {
        Ok(()) => {
            debug!("Rate limit check passed for identifier: {}", identifier);

            // Add rate limit headers
            let mut response = next.run(request).await;
            if let Some(current_usage) = rate_limiter.get_current_usage(&identifier) {
                add_rate_limit_headers(&mut response, current_usage, &rate_limiter);
            }
            response
        }
        Err(RateLimitError::LimitExceeded { requests, limit }) => {
            warn!(
                "Rate limit exceeded for identifier '{}': {}/{} requests",
                identifier, requests, limit
            );

            let mut response = create_rate_limit_exceeded_response(&rate_limiter);
            add_rate_limit_headers(&mut response, requests, &rate_limiter);
            response
        }
    }
}

fn extract_identifier(request: &Request) -> String {
    // Identifier sources in order of preference:
    // 1. X-Forwarded-For header (for proxied requests)
    // 2. X-Real-IP header
    // 3. Fallback to "unknown"

    if let Some(forwarded_for) = request.headers().get("x-forwarded-for")
        && let Ok(forwarded_str) = forwarded_for.to_str()
    {
        // Take the first IP from the comma-separated list
        if let Some(first_ip) = forwarded_str.split(',').next() {
            return first_ip.trim().to_string();
        }
    }

    if let Some(real_ip) = request.headers().get("x-real-ip")
        && let Ok(ip_str) = real_ip.to_str()
    {
        return ip_str.to_string();
    }

    "unknown".to_string()
}

fn create_rate_limit_exceeded_response(rate_limiter: &RateLimiter) -> Response {
    let body = serde_json::json!({
        "error": "Too many requests, try again later.",
        "retryAfter": rate_limiter.retry_after_seconds(),
    });

    (
        StatusCode::TOO_MANY_REQUESTS,
        [("content-type", "application/json")],
        body.to_string(),
    )
        .into_response()
}

fn add_rate_limit_headers(response: &mut Response, current_usage: i64, rate_limiter: &RateLimiter) {
    let headers = response.headers_mut();

    if let Ok(usage_header) = HeaderValue::from_str(&current_usage.to_string()) {
        headers.insert("X-RateLimit-Used", usage_header);
    }

    if let Ok(limit_header) = HeaderValue::from_str(&rate_limiter.max_requests().to_string()) {
        headers.insert("X-RateLimit-Limit", limit_header);
    }

    let remaining = (rate_limiter.max_requests() - current_usage).max(0);
    if let Ok(remaining_header) = HeaderValue::from_str(&remaining.to_string()) {
        headers.insert("X-RateLimit-Remaining", remaining_header);
    }

    if let Ok(window_header) = HeaderValue::from_str(&rate_limiter.window_ms().to_string()) {
        headers.insert("X-RateLimit-Window", window_header);
    }
}
