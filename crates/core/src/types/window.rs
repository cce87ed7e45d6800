//! Reporting time windows.
//!
//! Time-based reports query Shopify for records created in the last N days.
//! The day count comes straight from a dashboard query string, so parsing
//! never fails: garbage becomes the default window.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Window length used when the caller supplies nothing usable.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Upper bound on the window length (ten years).
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// A creation-date window ending at "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Inclusive lower bound.
    pub start: DateTime<Utc>,
    /// Inclusive upper bound (the moment the window was computed).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window covering the `days` days before `now`.
    ///
    /// `days` is clamped to `1..=MAX_WINDOW_DAYS`.
    #[must_use]
    pub fn last_days(days: u32, now: DateTime<Utc>) -> Self {
        let days = days.clamp(1, MAX_WINDOW_DAYS);
        Self {
            start: now - TimeDelta::days(i64::from(days)),
            end: now,
        }
    }

    /// Lower bound as ISO-8601 UTC with millisecond precision.
    #[must_use]
    pub fn start_iso(&self) -> String {
        iso8601(self.start)
    }

    /// Upper bound as ISO-8601 UTC with millisecond precision.
    #[must_use]
    pub fn end_iso(&self) -> String {
        iso8601(self.end)
    }
}

/// Format a timestamp the way Shopify's `created_at_*` filters expect
/// (`2024-07-01T12:00:00.000Z`).
fn iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a caller-supplied day count.
///
/// Accepts a leading integer prefix after optional whitespace (`"14"`,
/// `" 7days"`). Absent or non-numeric input yields [`DEFAULT_WINDOW_DAYS`].
/// Numeric input is clamped to `1..=MAX_WINDOW_DAYS`.
#[must_use]
pub fn parse_days(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return DEFAULT_WINDOW_DAYS;
    };

    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let digits_len = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let Some(digits) = unsigned.get(..digits_len).filter(|d| !d.is_empty()) else {
        return DEFAULT_WINDOW_DAYS;
    };

    if negative {
        return 1;
    }

    // Digit strings too long for u64 are still "a big number".
    digits.parse::<u64>().map_or(MAX_WINDOW_DAYS, |n| {
        u32::try_from(n)
            .unwrap_or(u32::MAX)
            .clamp(1, MAX_WINDOW_DAYS)
    })
}
