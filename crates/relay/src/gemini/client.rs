//! Gemini API client.
//!
//! Provides non-streaming access to `models/{model}:generateContent`.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::config::GeminiConfig;

use super::error::GeminiError;
use super::types::{GenerateContentRequest, GenerateContentResponse};

/// Gemini API client.
///
/// The API key is supplied per call, so the client can be built before
/// credentials are known.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &GeminiConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                model: config.model.clone(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// The `generateContent` endpoint for the configured model.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.inner.base_url, self.inner.model
        )
    }

    /// Send `prompt` as a single user turn and return the generated text.
    ///
    /// The text is returned verbatim.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError::Request` on a non-success status and
    /// `GeminiError::EmptyResponse` when no candidate text is present.
    #[instrument(skip(self, prompt, api_key), fields(model = %self.inner.model, prompt_len = prompt.len()))]
    pub async fn generate(
        &self,
        prompt: &str,
        api_key: &SecretString,
    ) -> Result<String, GeminiError> {
        let request = GenerateContentRequest::user_prompt(prompt);

        let response = self
            .inner
            .client
            .post(self.endpoint())
            .query(&[("key", api_key.expose_secret())])
            .json(&request)
            .send()
            .await
            // The request URL carries the API key.
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Gemini API error");
            return Err(GeminiError::Request {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))?;

        match parsed.first_text() {
            Some(text) => Ok(text.to_string()),
            None => {
                let block_reason = parsed
                    .prompt_feedback
                    .as_ref()
                    .and_then(|f| f.block_reason.as_deref());
                let finish_reason = parsed
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.as_deref());
                tracing::error!(?block_reason, ?finish_reason, "Gemini returned no text");
                Err(GeminiError::EmptyResponse)
            }
        }
    }
}
