//! Gemini API integration for report analysis and follow-up questions.
//!
//! # Features
//!
//! - Single-turn `generateContent` calls (no streaming, no history)
//! - Prompt templates per report type
//! - Follow-up answers restricted to previously fetched report data
//!
//! The API key is sent as the `key` query parameter, per Google's REST API.

mod client;
mod error;
pub mod prompts;
pub mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
