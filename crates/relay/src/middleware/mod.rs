//! HTTP middleware stack for the relay.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`)
//! 2. `TraceLayer` (request span with method, URI, status, latency)
//! 3. Request ID (recorded in the span, echoed in the response)
//! 4. CORS (the dashboard calls the relay from the browser)

pub mod request_id;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};

use crate::config::RelayConfig;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};

/// Build the CORS layer.
///
/// Allows any origin unless `CORS_ALLOWED_ORIGIN` is configured. An origin
/// that is not a valid header value is logged and ignored.
#[must_use]
pub fn cors_layer(config: &RelayConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    match config.cors_allowed_origin.as_deref() {
        Some(origin) => match HeaderValue::from_str(origin) {
            Ok(value) => layer.allow_origin(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS_ALLOWED_ORIGIN {origin:?}: {e}");
                layer.allow_origin(Any)
            }
        },
        None => layer.allow_origin(Any),
    }
}
