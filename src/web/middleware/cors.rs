//! CORS middleware configuration.

use axum::http::header::{
    HeaderName, ACCEPT, ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, RANGE,
};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

/// Create a CORS layer from configuration.
///
/// With no origins (or none that parse) any origin is allowed without
/// credentials. Otherwise only the listed origins are allowed, with
/// credentials.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    // Players need these to seek within partial responses.
    let exposed: [HeaderName; 3] = [CONTENT_RANGE, ACCEPT_RANGES, CONTENT_LENGTH];

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let parsed_origins: Vec<HeaderValue> =
        origins.iter().filter_map(|o| o.parse().ok()).collect();

    if parsed_origins.is_empty() {
        if !origins.is_empty() {
            tracing::warn!("No valid CORS origins in {:?}, allowing any origin", origins);
        }
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers(Any)
            .expose_headers(exposed)
            .allow_origin(Any)
    } else {
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([CONTENT_TYPE, ACCEPT, RANGE])
            .expose_headers(exposed)
            .allow_credentials(true)
            .allow_origin(parsed_origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request},
        routing::get,
        Router,
    };
    use tower::util::ServiceExt;

    async fn cors_headers(layer: CorsLayer, origin: &str) -> header::HeaderMap {
        let app = Router::new().route("/", get(|| async { "OK" })).layer(layer);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        response.headers().clone()
    }

    async fn request_with_origin(layer: CorsLayer, origin: &str) -> Option<HeaderValue> {
        cors_headers(layer, origin)
            .await
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .cloned()
    }

    #[tokio::test]
    async fn test_empty_origins_allow_any() {
        let allowed = request_with_origin(create_cors_layer(&[]), "http://example.com").await;
        assert_eq!(allowed.unwrap(), "*");
    }

    #[tokio::test]
    async fn test_explicit_origins() {
        let origins = vec!["http://localhost:5173".to_string()];

        let allowed =
            request_with_origin(create_cors_layer(&origins), "http://localhost:5173").await;
        assert_eq!(allowed.unwrap(), "http://localhost:5173");

        let denied = request_with_origin(create_cors_layer(&origins), "http://evil.test").await;
        assert!(denied.is_none());
    }

    #[tokio::test]
    async fn test_range_headers_exposed() {
        let origins = vec!["http://localhost:5173".to_string()];

        for layer in [create_cors_layer(&origins), create_cors_layer(&[])] {
            let headers = cors_headers(layer, "http://localhost:5173").await;
            let exposed = headers
                .get(header::ACCESS_CONTROL_EXPOSE_HEADERS)
                .unwrap()
                .to_str()
                .unwrap()
                .to_ascii_lowercase();

            assert!(exposed.contains("content-range"));
            assert!(exposed.contains("accept-ranges"));
            assert!(exposed.contains("content-length"));
        }
    }
}
