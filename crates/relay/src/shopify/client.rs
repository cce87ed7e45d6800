//! Shopify Admin REST API client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::config::ShopifyConfig;

use super::ShopifyError;
use super::resolver::{ReportQuery, normalize_store_domain};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Shopify Admin REST API client.
///
/// Store domain and access token are supplied per call, so the client can
/// be built before credentials are known.
#[derive(Clone)]
pub struct ShopifyClient {
    inner: Arc<ShopifyClientInner>,
}

struct ShopifyClientInner {
    client: reqwest::Client,
    api_version: String,
    base_url: Option<String>,
}

impl ShopifyClient {
    /// Create a new Shopify client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ShopifyConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            inner: Arc::new(ShopifyClientInner {
                client,
                api_version: config.api_version.clone(),
                base_url: config
                    .base_url
                    .as_ref()
                    .map(|url| url.trim_end_matches('/').to_string()),
            }),
        })
    }

    /// Full URL (without query string) of a resource's `.json` endpoint.
    #[must_use]
    pub fn resource_url(&self, store_domain: &str, resource: &str) -> String {
        let origin = self.inner.base_url.clone().unwrap_or_else(|| {
            format!("https://{}", normalize_store_domain(store_domain))
        });
        format!(
            "{origin}/admin/api/{}/{resource}.json",
            self.inner.api_version
        )
    }

    /// Fetch one page of a report resource.
    ///
    /// Returns the response body as parsed JSON, unmodified.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Upstream` on a non-success status, or a
    /// transport/parse error.
    #[instrument(
        skip(self, access_token, query),
        fields(report = %query.report, resource = query.resource)
    )]
    pub async fn fetch_report(
        &self,
        store_domain: &str,
        access_token: &SecretString,
        query: &ReportQuery,
    ) -> Result<serde_json::Value, ShopifyError> {
        let mut token = HeaderValue::from_str(access_token.expose_secret())
            .map_err(|_| ShopifyError::InvalidAccessToken)?;
        token.set_sensitive(true);

        let response = self
            .inner
            .client
            .get(self.resource_url(store_domain, query.resource))
            .header(ACCESS_TOKEN_HEADER, token)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .query(&query.params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Shopify API error");
            return Err(ShopifyError::Upstream {
                report: query.report.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let payload = serde_json::from_str(&body)?;
        tracing::debug!(bytes = body.len(), "Fetched Shopify report");
        Ok(payload)
    }
}
