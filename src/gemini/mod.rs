// Gemini API client module
// Author: kelexine (https://github.com/kelexine)

mod client;

pub use client::GeminiClient;

use thiserror::Error;

/// Finish reasons after which a candidate's text must not be used.
pub const BAD_FINISH_REASONS: &[&str] = &["SAFETY", "RECITATION", "LANGUAGE"];

/// Failures of a single `generateContent` call.
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("Gemini API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Response parsing error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Prompt blocked by Gemini: {0}")]
    Blocked(String),

    #[error("Gemini returned no candidates")]
    NoCandidates,
}
