use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

/// CORS layer scoped to the configured frontend origin. `*` (or an origin
/// that is not a valid header value) falls back to a permissive layer.
pub fn cors_layer(allowed_origin: &str) -> CorsLayer {
    if allowed_origin != "*" {
        if let Ok(origin) = allowed_origin.parse::<HeaderValue>() {
            return CorsLayer::new()
                .allow_methods(Any)
                .allow_headers(Any)
                .allow_origin(origin);
        }
        tracing::warn!(
            allowed_origin,
            "ALLOWED_ORIGIN is not a valid origin, falling back to permissive CORS"
        );
    }
    CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any)
}
