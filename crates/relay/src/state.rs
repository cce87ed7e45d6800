//! Application state shared across handlers.

use std::sync::Arc;

use crate::{config::RelayConfig, gemini::GeminiClient, shopify::ShopifyClient};

/// Application state shared across all handlers.
///
/// Read-only after construction; cloning is an `Arc` bump.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RelayConfig,
    shopify: ShopifyClient,
    gemini: GeminiClient,
}

impl AppState {
    /// Build the state and its HTTP clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be constructed.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let shopify = ShopifyClient::new(&config.shopify, config.upstream_timeout)?;
        let gemini = GeminiClient::new(&config.gemini, config.upstream_timeout)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                shopify,
                gemini,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &RelayConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn shopify(&self) -> &ShopifyClient {
        &self.inner.shopify
    }

    #[must_use]
    pub fn gemini(&self) -> &GeminiClient {
        &self.inner.gemini
    }
}
