//! HTTP client for the Generative Language (Gemini) service.
//!
//! One endpoint is used: `generateContent` with a single user turn.
//! Failures surface as `ApiError` wrapped in `anyhow::Error`; nothing is
//! retried.

mod client;
mod types;

pub use client::{ApiClient, CliMode};
