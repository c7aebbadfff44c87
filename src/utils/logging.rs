//! Structured logging and security-focused trace utilities.
//!
//! This module configures the `tracing` ecosystem for the application,
//! supporting multiple output formats and providing utilities to prevent
//! sensitive data (like API keys) from leaking into logs.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::{Result, TranslateError};
use regex::Regex;
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static API_KEY_REGEX: OnceLock<Regex> = OnceLock::new();
static BASIC_AUTH_REGEX: OnceLock<Regex> = OnceLock::new();

fn api_key_regex() -> &'static Regex {
    API_KEY_REGEX.get_or_init(|| Regex::new(r"AIza[0-9A-Za-z_\-]{10,}").expect("Invalid regex pattern"))
}

fn basic_auth_regex() -> &'static Regex {
    BASIC_AUTH_REGEX
        .get_or_init(|| Regex::new(r"Basic [A-Za-z0-9+/=]+").expect("Invalid regex pattern"))
}

/// Initializes the global tracing subscriber for the application.
///
/// Supports two output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| TranslateError::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let installed = match config.format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
    };

    installed.map_err(|e| TranslateError::Internal(format!("Failed to install logger: {}", e)))
}

/// Sanitizes sensitive information from log messages.
///
/// Google API keys (`AIza...`) and HTTP Basic credentials are replaced with
/// placeholders so upstream error bodies can be logged verbatim.
pub fn sanitize(input: &str) -> String {
    let result = api_key_regex().replace_all(input, "[REDACTED_API_KEY]");
    basic_auth_regex()
        .replace_all(&result, "Basic [REDACTED_CREDENTIALS]")
        .into_owned()
}
