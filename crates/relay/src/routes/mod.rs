//! HTTP route handlers for the relay.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//!
//! # Analytics
//! GET  /api/analytics?report=&days= - Fetch a report and analyze it
//!                                     (any non-POST method takes this path)
//! POST /api/analytics              - Answer a follow-up question
//! ```

pub mod analytics;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::{middleware as relay_middleware, state::AppState};

/// Path of the analytics endpoint.
pub const ANALYTICS_PATH: &str = "/api/analytics";

/// Follow-up bodies carry a whole report page back to the relay.
const MAX_CHAT_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Build the route table.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health)).route(
        ANALYTICS_PATH,
        post(analytics::chat)
            .fallback(analytics::report)
            .layer(DefaultBodyLimit::max(MAX_CHAT_BODY_BYTES)),
    )
}

/// Build the full application router with tracing, request IDs, and CORS.
///
/// Sentry layers are added by the binary on top of this.
pub fn build_router(state: AppState) -> Router {
    let cors = relay_middleware::cors_layer(state.config());

    routes()
        .layer(cors)
        .layer(middleware::from_fn(relay_middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                        span.record("status", response.status().as_u16());
                        span.record("latency_ms", latency_ms);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check upstream APIs.
async fn health() -> &'static str {
    "ok"
}
