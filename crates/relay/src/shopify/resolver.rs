//! Report type to REST resource resolution.
//!
//! Never fails: an unknown report type resolves to `orders` and a bad day
//! count resolves to the 30-day default. The dashboard relies on this
//! permissiveness, so input errors are absorbed here rather than reported.

use chrono::{DateTime, Utc};
use storelens_core::{ReportType, TimeWindow, parse_days};

/// Page size requested from Shopify. Only the first page is fetched.
pub const PAGE_LIMIT: u32 = 250;

/// A resolved Shopify REST query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    /// Report tag as requested. Differs from `report_type` when the tag is
    /// not a known report.
    pub report: String,
    /// Report the query was resolved for.
    pub report_type: ReportType,
    /// REST resource name (`{resource}.json`).
    pub resource: &'static str,
    /// Query parameters, in the order they are sent.
    pub params: Vec<(&'static str, String)>,
}

impl ReportQuery {
    /// Resolve a typed report and day count against `now`.
    #[must_use]
    pub fn new(report_type: ReportType, days: u32, now: DateTime<Utc>) -> Self {
        let mut params = Vec::with_capacity(4);

        if report_type.is_time_based() {
            let window = TimeWindow::last_days(days, now);
            params.push(("status", "any".to_string()));
            params.push(("created_at_min", window.start_iso()));
            params.push(("created_at_max", window.end_iso()));
        }
        params.push(("limit", PAGE_LIMIT.to_string()));

        Self {
            report: report_type.as_str().to_string(),
            report_type,
            resource: resource_path(report_type),
            params,
        }
    }

    /// Look up a parameter value by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Resolve raw dashboard input (`report` and `days` query values).
///
/// An absent or empty `report` means `orders`. Any other tag is kept as
/// given in [`ReportQuery::report`], even when it resolves to `orders`.
#[must_use]
pub fn resolve(report: Option<&str>, days: Option<&str>, now: DateTime<Utc>) -> ReportQuery {
    let tag = report
        .filter(|tag| !tag.is_empty())
        .unwrap_or(ReportType::default().as_str());

    ReportQuery {
        report: tag.to_string(),
        ..ReportQuery::new(ReportType::parse_lenient(Some(tag)), parse_days(days), now)
    }
}

/// REST resource backing each report type.
#[must_use]
pub const fn resource_path(report_type: ReportType) -> &'static str {
    match report_type {
        ReportType::Discounts => "price_rules",
        other => other.as_str(),
    }
}

/// Strip a leading `http://` or `https://` and any trailing `/` from a
/// configured store domain.
#[must_use]
pub fn normalize_store_domain(domain: &str) -> &str {
    let domain = domain.trim();
    domain
        .strip_prefix("https://")
        .or_else(|| domain.strip_prefix("http://"))
        .unwrap_or(domain)
        .trim_end_matches('/')
}
