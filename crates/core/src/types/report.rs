//! Report type enumeration.
//!
//! A report type selects both the Shopify resource that is queried and the
//! analysis prompt template. Dashboard input is parsed leniently: anything
//! unrecognized falls back to [`ReportType::Orders`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned by strict parsing of a report type tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown report type: {0}")]
pub struct UnknownReportType(pub String);

/// Report selectable from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    #[default]
    Orders,
    Products,
    Customers,
    DraftOrders,
    Fulfillments,
    Locations,
    MarketingEvents,
    Themes,
    Pages,
    ScriptTags,
    ShippingZones,
    Companies,
    Discounts,
    InventoryLevels,
}

impl ReportType {
    /// Every report type, in dashboard order.
    pub const ALL: [Self; 14] = [
        Self::Orders,
        Self::Products,
        Self::Customers,
        Self::DraftOrders,
        Self::Fulfillments,
        Self::Locations,
        Self::MarketingEvents,
        Self::Themes,
        Self::Pages,
        Self::ScriptTags,
        Self::ShippingZones,
        Self::Companies,
        Self::Discounts,
        Self::InventoryLevels,
    ];

    /// Wire tag used in query strings and request bodies.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Products => "products",
            Self::Customers => "customers",
            Self::DraftOrders => "draft_orders",
            Self::Fulfillments => "fulfillments",
            Self::Locations => "locations",
            Self::MarketingEvents => "marketing_events",
            Self::Themes => "themes",
            Self::Pages => "pages",
            Self::ScriptTags => "script_tags",
            Self::ShippingZones => "shipping_zones",
            Self::Companies => "companies",
            Self::Discounts => "discounts",
            Self::InventoryLevels => "inventory_levels",
        }
    }

    /// Human-readable name, used as the data label in prompts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Orders => "Orders",
            Self::Products => "Products",
            Self::Customers => "Customers",
            Self::DraftOrders => "Draft Orders",
            Self::Fulfillments => "Fulfillments",
            Self::Locations => "Locations",
            Self::MarketingEvents => "Marketing Events",
            Self::Themes => "Themes",
            Self::Pages => "Pages",
            Self::ScriptTags => "Script Tags",
            Self::ShippingZones => "Shipping Zones",
            Self::Companies => "Companies",
            Self::Discounts => "Discounts",
            Self::InventoryLevels => "Inventory Levels",
        }
    }

    /// Whether the report is bounded by a creation-date window.
    #[must_use]
    pub const fn is_time_based(self) -> bool {
        matches!(
            self,
            Self::Orders | Self::DraftOrders | Self::Fulfillments | Self::MarketingEvents
        )
    }

    /// Parse a dashboard-supplied tag, falling back to `Orders` when the tag
    /// is absent or unrecognized.
    #[must_use]
    pub fn parse_lenient(tag: Option<&str>) -> Self {
        tag.and_then(|t| t.parse().ok()).unwrap_or_default()
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportType {
    type Err = UnknownReportType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|report| report.as_str() == s)
            .ok_or_else(|| UnknownReportType(s.to_string()))
    }
}
