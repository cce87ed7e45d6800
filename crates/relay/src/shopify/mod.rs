//! Shopify Admin REST API access (HIGH PRIVILEGE).
//!
//! # Security
//!
//! **This module handles the store's Admin API access token.** The token is
//! only ever sent as the `X-Shopify-Access-Token` header and never logged.
//!
//! # Architecture
//!
//! - [`resolver`] turns a report type and day count into a REST resource
//!   and query string. Pure, no I/O.
//! - [`ShopifyClient`] performs the authenticated GET and returns the JSON
//!   body untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! use storelens_relay::shopify::{ShopifyClient, resolver};
//!
//! let client = ShopifyClient::new(&config.shopify, config.upstream_timeout)?;
//! let query = resolver::resolve(Some("customers"), Some("14"), chrono::Utc::now());
//! let payload = client.fetch_report(store_domain, access_token, &query).await?;
//! ```

mod client;
pub mod resolver;

pub use client::ShopifyClient;
pub use resolver::{PAGE_LIMIT, ReportQuery};

use thiserror::Error;

/// Errors that can occur when fetching report data from Shopify.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// Shopify answered with a non-success status.
    #[error("Shopify API request failed for report '{report}' with status {status}")]
    Upstream {
        /// Report tag as the caller requested it.
        report: String,
        /// HTTP status returned by Shopify.
        status: u16,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Access token cannot be sent as a header value.
    #[error("Shopify access token contains characters not allowed in a header")]
    InvalidAccessToken,
}
