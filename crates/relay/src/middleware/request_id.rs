//! Request ID middleware for correlating dashboard calls with upstream work.
//!
//! A report request fans out to Shopify and then Gemini. The request ID ties
//! the log lines and any Sentry event from both calls back to the one
//! dashboard request. The ID is:
//! - Recorded in the `http_request` span opened by the trace layer
//! - Added to the Sentry scope as a tag
//! - Echoed in the `x-request-id` response header

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied ID that is reused as is.
pub const MAX_REQUEST_ID_LEN: usize = 128;

/// Middleware that ensures every request has a request ID.
///
/// An `x-request-id` set by a proxy in front of the relay is reused when it
/// is usable (see [`incoming_request_id`]). Otherwise a new UUID v4 is
/// generated.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(request.headers())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// The caller's request ID, if it is non-empty visible ASCII of at most
/// [`MAX_REQUEST_ID_LEN`] bytes.
///
/// The ID ends up in log fields and Sentry tags, so oversized or opaque
/// values are replaced rather than propagated.
#[must_use]
pub fn incoming_request_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
}
