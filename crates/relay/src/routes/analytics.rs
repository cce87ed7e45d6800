//! Analytics route handlers.
//!
//! One endpoint, two flows:
//! - any non-POST: fetch a Shopify report and return it with an AI analysis
//! - POST: answer a follow-up question about report data the dashboard
//!   already holds
//!
//! Both flows check credentials first, so a misconfigured relay reports the
//! missing keys regardless of what the request looked like.

use axum::{
    Json,
    body::Bytes,
    extract::{
        Query, State,
        rejection::{BytesRejection, QueryRejection},
    },
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::{
    error::AppError,
    gemini::prompts,
    shopify::resolver,
    state::AppState,
};

// =============================================================================
// Request / Response Types
// =============================================================================

/// Query parameters for the report flow.
///
/// Kept as raw strings: bad values fall back to defaults instead of
/// rejecting the request.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReportParams {
    /// Report type tag (default: orders)
    pub report: Option<String>,
    /// Window length in days (default: 30)
    pub days: Option<String>,
}

impl ReportParams {
    /// Collect parameters from decoded query pairs.
    ///
    /// The first occurrence of a repeated key wins; unknown keys are ignored.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "report" => &mut params.report,
                "days" => &mut params.days,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// Report flow response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    /// Shopify response body, unmodified.
    pub shopify_data: Value,
    /// Generated analysis (Markdown).
    pub analysis: String,
}

/// Follow-up question body. Fields are optional so that missing ones can be
/// reported together.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub question: Option<String>,
    pub report_data: Option<Value>,
    pub report_type: Option<String>,
}

/// A chat request with every required field present.
#[derive(Debug)]
pub struct ValidChatRequest {
    pub question: String,
    pub report_data: Value,
    pub report_type: String,
}

impl ChatRequest {
    /// Check required fields, naming every missing one.
    ///
    /// Empty strings and `null` count as missing. Whitespace is content.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing the missing fields.
    pub fn validate(self) -> Result<ValidChatRequest, AppError> {
        let question = self.question.filter(|q| !q.is_empty());
        let report_data = self.report_data.filter(|d| !d.is_null());
        let report_type = self.report_type.filter(|t| !t.is_empty());

        match (question, report_data, report_type) {
            (Some(question), Some(report_data), Some(report_type)) => Ok(ValidChatRequest {
                question,
                report_data,
                report_type,
            }),
            (question, report_data, report_type) => {
                let missing: Vec<&str> = [
                    ("question", question.is_none()),
                    ("reportData", report_data.is_none()),
                    ("reportType", report_type.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
                Err(AppError::Validation(format!(
                    "Missing required fields: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

/// Chat flow response.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Generated answer (Markdown).
    pub answer: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Fetch a report from Shopify and analyze it.
///
/// A query string that cannot be decoded is treated as empty, so the
/// request falls back to the default report and window.
///
/// # Errors
///
/// Returns an error if credentials are missing, Shopify rejects the request,
/// or the AI call fails.
#[instrument(skip(state, pairs))]
pub async fn report(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ReportResponse>, AppError> {
    let credentials = state.config().credentials()?;

    let params = match pairs {
        Ok(Query(pairs)) => ReportParams::from_pairs(pairs),
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Ignoring undecodable query string");
            ReportParams::default()
        }
    };
    let query = resolver::resolve(
        params.report.as_deref(),
        params.days.as_deref(),
        Utc::now(),
    );

    let shopify_data = state
        .shopify()
        .fetch_report(credentials.store_domain, credentials.access_token, &query)
        .await?;

    let prompt = prompts::analysis_prompt(&shopify_data, &query.report);
    let analysis = state
        .gemini()
        .generate(&prompt, credentials.gemini_api_key)
        .await?;

    tracing::info!(report = %query.report, resource = query.resource, "Report analyzed");

    Ok(Json(ReportResponse {
        shopify_data,
        analysis,
    }))
}

/// Answer a follow-up question about previously fetched report data.
///
/// The body is taken as raw bytes, and its rejection is held back, so that
/// credentials are checked before the body is looked at.
///
/// # Errors
///
/// Returns an error if credentials are missing, the body is unreadable,
/// invalid or incomplete, or the AI call fails.
#[instrument(skip(state, body))]
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let credentials = state.config().credentials()?;

    let body = body?;
    let request: ChatRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))?;
    let request = request.validate()?;

    let prompt = prompts::chat_prompt(
        &request.question,
        &request.report_data,
        &request.report_type,
    );
    let answer = state
        .gemini()
        .generate(&prompt, credentials.gemini_api_key)
        .await?;

    tracing::info!(report_type = %request.report_type, "Follow-up answered");

    Ok(Json(ChatResponse { answer }))
}
