//! Core types for Storelens.
//!
//! This module provides type-safe wrappers for report selection.

pub mod report;
pub mod window;

pub use report::{ReportType, UnknownReportType};
pub use window::{DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS, TimeWindow, parse_days};
