use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Serializes a value as a JSON response, pretty-printed when requested.
///
/// Serialization of these response types cannot realistically fail, but if
/// it ever does the failure is logged and surfaced as a generic 500 rather
/// than a panic.
pub fn json_response<T: Serialize>(status: StatusCode, value: &T, pretty: bool) -> Response {
    let serialized = if pretty {
        serde_json::to_vec_pretty(value)
    } else {
        serde_json::to_vec(value)
    };

    match serialized {
        Ok(body) => (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to serialize response body: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "application/json")],
                br#"{"error":"Internal server error","message":"Something went wrong!"}"#.to_vec(),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_compact_output() {
        let response = json_response(StatusCode::OK, &json!({"a": 1, "b": 2}), false);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(!body.contains(&b'\n'));
    }

    #[tokio::test]
    async fn test_pretty_output() {
        let response = json_response(StatusCode::OK, &json!({"a": 1, "b": 2}), true);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.contains(&b'\n'));
    }
}
