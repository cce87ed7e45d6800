//! Unified error handling for the relay.
//!
//! Every failure reaches the dashboard as `{"error": "<message>"}` with an
//! HTTP status. Server-side failures are logged and captured to Sentry
//! before the response is built.

use axum::{
    Json,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::config::MissingCredentials;
use crate::gemini::GeminiError;
use crate::shopify::ShopifyError;

/// Message returned for every AI failure. Details stay in the logs.
pub const AI_FAILURE_MESSAGE: &str = "Failed to get a response from the AI service.";

/// Application-level error type for the relay.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request-time credentials are not configured.
    #[error("{0}")]
    Configuration(#[from] MissingCredentials),

    /// Client sent an incomplete or malformed request.
    #[error("{0}")]
    Validation(String),

    /// Request body could not be read (too large, aborted, ...).
    #[error("{0}")]
    Body(#[from] BytesRejection),

    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Gemini API operation failed.
    #[error("AI error: {0}")]
    Gemini(#[from] GeminiError),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Body(rejection) => rejection.status(),
            Self::Shopify(ShopifyError::Upstream { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Configuration(_) | Self::Shopify(_) | Self::Gemini(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message sent to the client in the `error` field.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Configuration(missing) => missing.to_string(),
            Self::Validation(message) => message.clone(),
            Self::Body(rejection) => rejection.body_text(),
            Self::Shopify(err) => err.to_string(),
            Self::Gemini(_) => AI_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if matches!(self, Self::Validation(_) | Self::Body(_)) {
            tracing::warn!(error = %self, "Rejected request");
        } else {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                status = status.as_u16(),
                sentry_event_id = %event_id,
                "Relay request error"
            );
        }

        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}
