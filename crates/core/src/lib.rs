//! Storelens Core - Shared report types.
//!
//! This crate provides the domain types used by the Storelens relay:
//! - `relay` - HTTP relay between the dashboard, Shopify, and Gemini
//! - `integration-tests` - End-to-end router tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no clock reads. Callers pass in the current time.
//!
//! # Modules
//!
//! - [`types`] - Report type enumeration and reporting time windows

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
