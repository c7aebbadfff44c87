// Error types for darija-translate
// Author: kelexine (https://github.com/kelexine)

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Realm advertised in `WWW-Authenticate` challenges.
pub const AUTH_REALM: &str = "Basic realm=\"Restricted\"";

/// Message returned to clients when a text translation fails upstream.
pub const TEXT_UPSTREAM_MESSAGE: &str = "Failed to translate text using Gemini API";

/// Message returned to clients when an image translation fails upstream.
pub const IMAGE_UPSTREAM_MESSAGE: &str = "Failed to translate image";

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The remote model could not produce a translation. `message` is safe to
    /// show to callers, `detail` is for server logs only.
    #[error("{message}")]
    UpstreamUnavailable { message: String, detail: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(AuthFailure),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Reasons the Basic Auth gate rejected a request.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("Authentication not configured on server")]
    NotConfigured,

    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl TranslateError {
    pub fn upstream(message: &str, detail: impl Into<String>) -> Self {
        TranslateError::UpstreamUnavailable {
            message: message.to_string(),
            detail: detail.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            TranslateError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            TranslateError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that may be returned to any caller.
    pub fn public_message(&self) -> String {
        match self {
            TranslateError::InvalidInput(msg) => msg.clone(),
            TranslateError::UpstreamUnavailable { message, .. } => message.clone(),
            TranslateError::Unauthorized(reason) => reason.to_string(),
            _ => "Something went wrong".to_string(),
        }
    }

    /// Internal detail, only surfaced in development mode.
    pub fn detail(&self) -> Option<String> {
        match self {
            TranslateError::InvalidInput(_) | TranslateError::Unauthorized(_) => None,
            TranslateError::UpstreamUnavailable { detail, .. } => Some(detail.clone()),
            other => Some(other.to_string()),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TranslateError::InvalidInput(_) => "Invalid input",
            TranslateError::UpstreamUnavailable { .. } => "Translation failed",
            TranslateError::Unauthorized(_) => "Unauthorized",
            _ => "Internal Server Error",
        }
    }

    /// Render the error envelope, optionally including the internal detail.
    pub fn into_response_with(self, expose_details: bool) -> Response {
        let status = self.status_code();

        if let TranslateError::Unauthorized(reason) = &self {
            let body = json!({ "success": false, "message": reason.to_string() });
            let mut response = (status, axum::Json(body)).into_response();
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(AUTH_REALM));
            return response;
        }

        let mut body = json!({
            "success": false,
            "error": self.label(),
            "message": self.public_message(),
        });

        if expose_details {
            if let Some(detail) = self.detail() {
                body["details"] = json!(detail);
            }
        }

        (status, axum::Json(body)).into_response()
    }
}

// Production rendering: never leaks internal detail
impl IntoResponse for TranslateError {
    fn into_response(self) -> Response {
        self.into_response_with(false)
    }
}

/// Error returned by HTTP handlers, carrying whether details may be exposed.
#[derive(Debug)]
pub struct ApiError {
    pub error: TranslateError,
    pub expose_details: bool,
}

impl ApiError {
    pub fn new(error: TranslateError, expose_details: bool) -> Self {
        Self { error, expose_details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.error.into_response_with(self.expose_details)
    }
}

pub type Result<T> = std::result::Result<T, TranslateError>;
