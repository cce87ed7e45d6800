//! Storelens Relay library.
//!
//! This crate provides the relay functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Security
//!
//! This crate handles HIGH PRIVILEGE credentials:
//! - Shopify Admin API access token (full store read access)
//! - Gemini API key
//!
//! Both are held server-side only and never returned to the dashboard.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod gemini;
pub mod middleware;
pub mod routes;
pub mod shopify;
pub mod state;
