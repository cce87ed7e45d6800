//! Error types for the Gemini API client.

use thiserror::Error;

/// Errors that can occur when interacting with the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gemini answered with a non-success status.
    #[error("AI request failed with status {status}")]
    Request {
        /// HTTP status returned by the API.
        status: u16,
    },

    /// No candidate text in an otherwise successful response.
    #[error("AI response contained no candidate text")]
    EmptyResponse,

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}
