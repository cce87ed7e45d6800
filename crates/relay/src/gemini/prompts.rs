//! Prompt construction for report analysis and follow-up questions.
//!
//! Both builders are pure: the same input always yields the same string.
//!
//! The initial analysis embeds only the value of the payload's first
//! top-level key (Shopify wraps every resource list in a single key such as
//! `{"orders": [...]}`), which keeps prompt size bounded. Follow-up prompts
//! embed the whole report so the model sees everything the dashboard shows.

use serde_json::Value;
use storelens_core::ReportType;

/// Sentence the model must use when the data does not contain the answer.
pub const REFUSAL_SENTENCE: &str =
    "I'm sorry, but I cannot answer that question based on the provided report data.";

const ANALYSIS_PREAMBLE: &str = "You are an expert e-commerce analyst reviewing data exported \
from a Shopify store. Write a concise report for the store owner in Markdown with three \
sections: \"Key Insights\", \"Trends & Patterns\", and \"Actionable Recommendations\". Use \
bullet points, keep the whole report under 400 words, and do not repeat the raw data back.";

const GENERIC_FOCUS: &str = "Focus: summarize the most important facts in this data and \
anything that looks unusual or worth the owner's attention.";

const CHAT_PREAMBLE: &str = "You are a helpful assistant answering questions about a Shopify \
store. Answer the question using ONLY the JSON data provided below. Do not use outside \
knowledge and do not guess. Keep the answer short and format it in Markdown.";

/// Report-specific focus clause for the initial analysis.
const fn focus_clause(report_type: Option<ReportType>) -> &'static str {
    let Some(report_type) = report_type else {
        return GENERIC_FOCUS;
    };
    match report_type {
        ReportType::Orders => {
            "Focus: sales volume, total revenue, average order value, best-selling products, \
             and the mix of financial and fulfillment statuses."
        }
        ReportType::Products => {
            "Focus: catalog composition, product types and vendors, pricing spread, \
             inventory exposure, and products that are drafts or archived."
        }
        ReportType::Customers => {
            "Focus: customer segments, repeat versus one-time buyers, total spent per \
             customer, order counts, and marketing consent rates."
        }
        ReportType::DraftOrders => {
            "Focus: open versus completed drafts, value sitting in unconverted drafts, \
             and how long drafts stay open."
        }
        ReportType::Fulfillments => {
            "Focus: fulfillment speed, shipment and tracking status, carriers used, and \
             any fulfillments that failed or were cancelled."
        }
        ReportType::Locations => {
            "Focus: the active and inactive locations, where they are, and which ones \
             fulfill online orders."
        }
        ReportType::MarketingEvents => {
            "Focus: which channels and marketing event types were used, how often, and \
             which campaigns are still running."
        }
        ReportType::Themes => {
            "Focus: which theme is published, which themes are unpublished or in \
             development, and how recently each was updated."
        }
        ReportType::Pages => {
            "Focus: published versus hidden pages, stale content that has not been \
             updated recently, and gaps in store information pages."
        }
        ReportType::ScriptTags => {
            "Focus: which third-party scripts are installed, where they load, and any \
             that may affect storefront performance or privacy."
        }
        ReportType::ShippingZones => {
            "Focus: countries covered, shipping rates and price ranges, free-shipping \
             thresholds, and regions with no coverage."
        }
        ReportType::Companies => {
            "Focus: B2B company accounts, their locations and contacts, and ordering \
             activity per company."
        }
        ReportType::Discounts => {
            "Focus: active versus expired price rules, discount values and types, usage \
             limits, and overlapping or long-running promotions."
        }
        ReportType::InventoryLevels => {
            "Focus: stock on hand per location, items that are out of stock or running \
             low, and uneven stock distribution between locations."
        }
    }
}

/// Build the prompt for the initial analysis of a freshly fetched report.
///
/// `report_tag` is the raw tag from the request. Unrecognized tags get the
/// generic focus clause. Only the value of the payload's first key is
/// embedded; a non-object or empty payload embeds `null`.
#[must_use]
pub fn analysis_prompt(payload: &Value, report_tag: &str) -> String {
    let focus = focus_clause(report_tag.parse().ok());
    let excerpt = payload
        .as_object()
        .and_then(|object| object.values().next())
        .unwrap_or(&Value::Null);

    format!(
        "{ANALYSIS_PREAMBLE}\n\n{focus}\n\nData:\n```json\n{}\n```",
        pretty(excerpt)
    )
}

/// Build the prompt for a follow-up question about previously fetched data.
///
/// The whole `report_data` value is embedded, along with the question as
/// given.
#[must_use]
pub fn chat_prompt(question: &str, report_data: &Value, report_tag: &str) -> String {
    let label = report_tag
        .parse::<ReportType>()
        .map_or(report_tag, |report| report.label());

    format!(
        "{CHAT_PREAMBLE} If the answer is not in the data, reply with exactly: \
         \"{REFUSAL_SENTENCE}\"\n\n\
         Data type: {label}\n\n\
         Question: {question}\n\n\
         Data:\n```json\n{}\n```",
        pretty(report_data)
    )
}

/// Pretty-print JSON with two-space indentation.
fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
