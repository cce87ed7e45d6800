//! Integration tests for Storelens.
//!
//! The relay router is driven in-process with `tower::ServiceExt::oneshot`,
//! while Shopify and Gemini are replaced by `wiremock` servers.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storelens-integration-tests
//! ```

use std::collections::HashMap;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use serde_json::{Value, json};
use storelens_relay::{config::RelayConfig, routes, state::AppState};
use tower::ServiceExt;
use wiremock::MockServer;

pub const STORE_DOMAIN: &str = "https://pineapple-test.myshopify.com";
pub const ACCESS_TOKEN: &str = "shpat_0f3c9a71d2e4";
pub const GEMINI_KEY: &str = "AIzaSyTest9k2LmQ";
pub const GEMINI_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

/// A relay wired to mock upstreams.
pub struct TestRelay {
    pub app: Router,
    pub shopify: MockServer,
    pub gemini: MockServer,
}

impl TestRelay {
    /// Relay with all three credentials configured.
    pub async fn new() -> Self {
        Self::with_credentials(&[
            ("SHOPIFY_STORE_DOMAIN", STORE_DOMAIN),
            ("SHOPIFY_ACCESS_TOKEN", ACCESS_TOKEN),
            ("GEMINI_API_KEY", GEMINI_KEY),
        ])
        .await
    }

    /// Relay with only the given credential variables set.
    pub async fn with_credentials(credentials: &[(&str, &str)]) -> Self {
        let shopify = MockServer::start().await;
        let gemini = MockServer::start().await;

        let mut vars: HashMap<String, String> = credentials
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        vars.insert("SHOPIFY_API_BASE_URL".to_string(), shopify.uri());
        vars.insert("GEMINI_API_BASE_URL".to_string(), gemini.uri());
        vars.insert("UPSTREAM_TIMEOUT_SECS".to_string(), "5".to_string());

        let config =
            RelayConfig::from_lookup(|key| vars.get(key).cloned()).expect("valid test config");
        let state = AppState::new(config).expect("state builds");

        Self {
            app: routes::build_router(state),
            shopify,
            gemini,
        }
    }

    /// Send a GET to the analytics endpoint with the given query string.
    pub async fn get_report(&self, query: &str) -> Response {
        let request = Request::builder()
            .method(Method::GET)
            .uri(format!("{}?{query}", routes::ANALYTICS_PATH))
            .body(Body::empty())
            .expect("request builds");
        self.send(request).await
    }

    /// POST a JSON body to the analytics endpoint.
    pub async fn post_chat(&self, body: &Value) -> Response {
        self.post_raw(body.to_string()).await
    }

    /// POST a raw body to the analytics endpoint.
    pub async fn post_raw(&self, body: String) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(routes::ANALYTICS_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .expect("request builds");
        self.send(request).await
    }

    /// Send an arbitrary request through the router.
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Prompt text of every request Gemini received, in order.
    pub async fn gemini_prompts(&self) -> Vec<String> {
        self.gemini
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| {
                let body: Value = request.body_json().ok()?;
                body.pointer("/contents/0/parts/0/text")?
                    .as_str()
                    .map(String::from)
            })
            .collect()
    }
}

/// A successful Gemini response carrying `text`.
#[must_use]
pub fn gemini_text_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

/// Read a response body as JSON.
pub async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = serde_json::from_slice(&bytes).expect("body is JSON");
    (status, value)
}
