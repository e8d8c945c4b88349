//! Router assembly: routes, CORS and upload size policy.

use crate::config::Config;
use crate::handlers;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the application router from configuration.
///
/// # Errors
///
/// Fails when a configured CORS origin is not a valid header value.
pub fn build_router(config: &Config) -> anyhow::Result<Router> {
    // Uploads are buffered whole. Over-limit reads surface in the handler,
    // so the 413 carries the same JSON body as every other rejection.
    let body_limit = match config.max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    let routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/upload", post(handlers::upload))
        .layer(body_limit);

    Ok(routes
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_allowed_origins)?))
}

/// CORS for the configured origins, any method and any header.
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", origin))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}
