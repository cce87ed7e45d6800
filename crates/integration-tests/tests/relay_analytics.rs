//! End-to-end tests for the analytics endpoint against mocked upstreams.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use chrono::{DateTime, TimeDelta};
use serde_json::json;
use storelens_integration_tests::{
    ACCESS_TOKEN, GEMINI_KEY, GEMINI_PATH, STORE_DOMAIN, TestRelay, gemini_text_response,
    json_body,
};
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{header, method, path, query_param, query_param_is_missing},
};

const AI_FAILURE: &str = "Failed to get a response from the AI service.";

async fn mount_gemini_answer(relay: &TestRelay, text: &str) {
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(query_param("key", GEMINI_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text_response(text)))
        .expect(1)
        .mount(&relay.gemini)
        .await;
}

// =============================================================================
// Report flow
// =============================================================================

#[tokio::test]
async fn report_fetches_customers_and_returns_analysis() {
    let relay = TestRelay::new().await;
    let customers = json!({
        "customers": [
            { "id": 1, "email": "ana@example.com", "orders_count": 4, "total_spent": "212.40" },
            { "id": 2, "email": "ben@example.com", "orders_count": 1, "total_spent": "18.00" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/admin/api/2024-07/customers.json"))
        .and(header("X-Shopify-Access-Token", ACCESS_TOKEN))
        .and(query_param("limit", "250"))
        .and(query_param_is_missing("created_at_min"))
        .and(query_param_is_missing("status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&customers))
        .expect(1)
        .mount(&relay.shopify)
        .await;
    mount_gemini_answer(&relay, "## Key Insights\nAna is a repeat buyer.").await;

    let (status, body) = json_body(relay.get_report("report=customers&days=14").await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shopifyData"], customers);
    assert_eq!(body["analysis"], "## Key Insights\nAna is a repeat buyer.");

    let prompts = relay.gemini_prompts().await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Focus: customer segments"));
    assert!(prompts[0].contains("ana@example.com"));
    assert!(prompts[0].contains("```json"));
}

#[tokio::test]
async fn report_defaults_to_thirty_days_of_orders() {
    let relay = TestRelay::new().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/2024-07/orders.json"))
        .and(query_param("status", "any"))
        .and(query_param("limit", "250"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "orders": [] })))
        .expect(1)
        .mount(&relay.shopify)
        .await;
    mount_gemini_answer(&relay, "No orders in this window.").await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/analytics")
        .body(Body::empty())
        .unwrap();
    let (status, body) = json_body(relay.send(request).await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shopifyData"], json!({ "orders": [] }));

    let received = relay.shopify.received_requests().await.unwrap();
    let params: Vec<(String, String)> = received[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let names: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        names,
        ["status", "created_at_min", "created_at_max", "limit"]
    );

    let min = &params[1].1;
    let max = &params[2].1;
    assert!(min.ends_with('Z') && max.ends_with('Z'));
    assert!(min < max);
}

#[tokio::test]
async fn report_discounts_reads_price_rules() {
    let relay = TestRelay::new().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/2024-07/price_rules.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "price_rules": [{ "id": 9 }] })),
        )
        .expect(1)
        .mount(&relay.shopify)
        .await;
    mount_gemini_answer(&relay, "One active rule.").await;

    let (status, body) = json_body(relay.get_report("report=discounts").await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shopifyData"]["price_rules"][0]["id"], 9);
    assert!(relay.gemini_prompts().await[0].contains("price rules"));
}

#[tokio::test]
async fn report_unknown_type_falls_back_to_orders() {
    let relay = TestRelay::new().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/2024-07/orders.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "orders": [] })))
        .expect(1)
        .mount(&relay.shopify)
        .await;
    mount_gemini_answer(&relay, "Nothing to report.").await;

    let (status, _) = json_body(relay.get_report("report=gift_cards").await).await;

    assert_eq!(status, StatusCode::OK);
    assert!(relay.gemini_prompts().await[0].contains("Focus: summarize"));
}

#[tokio::test]
async fn report_passes_through_shopify_status() {
    let relay = TestRelay::new().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/2024-07/price_rules.json"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "errors": "Forbidden" })),
        )
        .expect(1)
        .mount(&relay.shopify)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text_response("unused")))
        .expect(0)
        .mount(&relay.gemini)
        .await;

    let (status, body) = json_body(relay.get_report("report=discounts").await).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "Shopify API request failed for report 'discounts' with status 403"
    );
}

#[tokio::test]
async fn upstream_error_names_requested_unknown_report() {
    let relay = TestRelay::new().await;

    // Unknown tags read orders, but the error names what was asked for.
    Mock::given(method("GET"))
        .and(path("/admin/api/2024-07/orders.json"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&relay.shopify)
        .await;

    let (status, body) = json_body(relay.get_report("report=inventory_items").await).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body["error"],
        "Shopify API request failed for report 'inventory_items' with status 503"
    );
}

#[tokio::test]
async fn report_ai_failure_uses_fixed_message() {
    let relay = TestRelay::new().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "orders": [] })))
        .mount(&relay.shopify)
        .await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&relay.gemini)
        .await;

    let (status, body) = json_body(relay.get_report("report=orders").await).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], AI_FAILURE);
}

#[tokio::test]
async fn report_gemini_error_status_is_hidden() {
    let relay = TestRelay::new().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "orders": [] })))
        .mount(&relay.shopify)
        .await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({ "error": { "code": 429 } })),
        )
        .mount(&relay.gemini)
        .await;

    let (status, body) = json_body(relay.get_report("report=orders").await).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], AI_FAILURE);
}

#[tokio::test]
async fn non_post_methods_take_report_path() {
    let relay = TestRelay::new().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/2024-07/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": [] })))
        .expect(1)
        .mount(&relay.shopify)
        .await;
    mount_gemini_answer(&relay, "No products.").await;

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/api/analytics?report=products")
        .body(Body::empty())
        .unwrap();
    let (status, body) = json_body(relay.send(request).await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"], "No products.");
}

#[tokio::test]
async fn report_repeated_query_key_uses_first_value() {
    let relay = TestRelay::new().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/2024-07/orders.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "orders": [] })))
        .expect(1)
        .mount(&relay.shopify)
        .await;
    mount_gemini_answer(&relay, "Quiet week.").await;

    let (status, body) = json_body(relay.get_report("report=orders&days=7&days=14").await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"], "Quiet week.");

    let received = relay.shopify.received_requests().await.unwrap();
    let param = |name: &str| {
        received[0]
            .url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| DateTime::parse_from_rfc3339(&v).unwrap())
            .unwrap()
    };
    assert_eq!(
        param("created_at_max") - param("created_at_min"),
        TimeDelta::days(7)
    );
}

#[tokio::test]
async fn report_empty_tag_is_orders() {
    let relay = TestRelay::new().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/2024-07/orders.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "orders": [] })))
        .expect(1)
        .mount(&relay.shopify)
        .await;
    mount_gemini_answer(&relay, "No orders.").await;

    let (status, _) = json_body(relay.get_report("report=").await).await;

    assert_eq!(status, StatusCode::OK);
    assert!(relay.gemini_prompts().await[0].contains("Focus: sales volume"));
}

// =============================================================================
// Configuration
// =============================================================================

#[tokio::test]
async fn missing_credentials_are_named() {
    let relay = TestRelay::with_credentials(&[("SHOPIFY_ACCESS_TOKEN", ACCESS_TOKEN)]).await;

    let (status, body) = json_body(relay.get_report("report=orders").await).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Missing required configuration: SHOPIFY_STORE_DOMAIN, GEMINI_API_KEY"
    );

    // Checked before the body is looked at.
    let (status, body) = json_body(relay.post_raw("not json".to_string()).await).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Missing required configuration: SHOPIFY_STORE_DOMAIN, GEMINI_API_KEY"
    );

    assert!(relay.shopify.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_credentials_count_as_missing() {
    let relay = TestRelay::with_credentials(&[
        ("SHOPIFY_STORE_DOMAIN", STORE_DOMAIN),
        ("SHOPIFY_ACCESS_TOKEN", "   "),
        ("GEMINI_API_KEY", GEMINI_KEY),
    ])
    .await;

    let (status, body) = json_body(relay.get_report("").await).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Missing required configuration: SHOPIFY_ACCESS_TOKEN"
    );
}

// =============================================================================
// Chat flow
// =============================================================================

#[tokio::test]
async fn chat_answers_from_report_data() {
    let relay = TestRelay::new().await;
    mount_gemini_answer(&relay, "**Ana** spent the most.").await;

    let report_data = json!({
        "customers": [
            { "email": "ana@example.com", "total_spent": "212.40" },
            { "email": "ben@example.com", "total_spent": "18.00" }
        ]
    });
    let (status, body) = json_body(
        relay
            .post_chat(&json!({
                "question": "Who is my top customer?",
                "reportData": report_data,
                "reportType": "customers"
            }))
            .await,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "answer": "**Ana** spent the most." }));

    let prompt = &relay.gemini_prompts().await[0];
    assert!(prompt.contains("Question: Who is my top customer?"));
    assert!(prompt.contains("Data type: Customers"));
    assert!(prompt.contains("ben@example.com"));
    assert!(prompt.contains("I'm sorry, but I cannot answer that question"));
    assert!(relay.shopify.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn chat_missing_fields_is_bad_request() {
    let relay = TestRelay::new().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text_response("unused")))
        .expect(0)
        .mount(&relay.gemini)
        .await;

    let (status, body) = json_body(
        relay
            .post_chat(&json!({
                "question": "Top product?",
                "reportData": { "products": [] }
            }))
            .await,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: reportType");
}

#[tokio::test]
async fn chat_invalid_json_is_bad_request() {
    let relay = TestRelay::new().await;

    let (status, body) = json_body(relay.post_raw("{\"question\":".to_string()).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON body")
    );
}

#[tokio::test]
async fn chat_oversized_body_is_json_error() {
    let relay = TestRelay::new().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text_response("unused")))
        .expect(0)
        .mount(&relay.gemini)
        .await;

    let oversized = "x".repeat(16 * 1024 * 1024 + 1);
    let response = relay.post_raw(oversized).await;

    assert_eq!(
        response.headers()["content-type"],
        "application/json"
    );
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].is_string());
}

// =============================================================================
// Middleware
// =============================================================================

#[tokio::test]
async fn responses_carry_request_id() {
    let relay = TestRelay::new().await;

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = relay.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-42");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ok");

    let response = relay.get_report("report=orders").await;
    assert!(response.headers().contains_key("x-request-id"));
}
