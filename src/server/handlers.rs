// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::{ApiError, TranslateError};
use crate::metrics;
use crate::translation::request::{INVALID_TEXT_MESSAGE, MISSING_IMAGE_MESSAGE};
use crate::translation::{ImageRequest, TextRequest, TranslationRequest};
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, OriginalUri, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Success envelope for both translation endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    pub translation: String,
    pub model: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub model: String,
    pub timestamp: String,
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

impl AppState {
    fn api_error(&self, error: TranslateError) -> ApiError {
        ApiError::new(error, self.config.mode.is_development())
    }
}

/// Handler for `POST /api/translate`
pub async fn translate_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!("Rejected translate body: {}", rejection.body_text());
            metrics::record_rejected("text");
            return Err(state.api_error(TranslateError::InvalidInput(
                INVALID_TEXT_MESSAGE.to_string(),
            )));
        }
    };

    let request = TextRequest::from_json(&body).map_err(|e| {
        metrics::record_rejected("text");
        state.api_error(e)
    })?;

    info!("Received text translation request");

    let original = request.text().to_string();
    let result = state
        .translator
        .translate(TranslationRequest::Text(request))
        .await
        .map_err(|e| state.api_error(e))?;

    Ok(Json(TranslateResponse {
        success: true,
        original: Some(original),
        translation: result.translation,
        model: state.translator.model().to_string(),
        timestamp: timestamp(),
    }))
}

/// Handler for `POST /api/translate-image` (multipart field `image`)
pub async fn translate_image_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let missing_image = || {
        metrics::record_rejected("image");
        state.api_error(TranslateError::InvalidInput(MISSING_IMAGE_MESSAGE.to_string()))
    };

    let mut multipart = multipart.map_err(|rejection| {
        debug!("Rejected image upload: {}", rejection.body_text());
        missing_image()
    })?;

    let mut image = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        metrics::record_rejected("image");
        state.api_error(TranslateError::InvalidInput(format!(
            "Invalid multipart body: {}",
            e.body_text()
        )))
    })? {
        // Only a file part named `image` counts as an upload
        if field.name() != Some("image") || field.file_name().is_none() {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| {
            metrics::record_rejected("image");
            state.api_error(TranslateError::InvalidInput(format!(
                "Invalid multipart body: {}",
                e.body_text()
            )))
        })?;

        image = Some(ImageRequest::new(bytes).with_file_name(file_name));
        break;
    }

    let image = image.ok_or_else(missing_image)?;

    info!("Received image translation request");

    let result = state
        .translator
        .translate(TranslationRequest::Image(image))
        .await
        .map_err(|e| state.api_error(e))?;

    Ok(Json(TranslateResponse {
        success: true,
        original: None,
        translation: result.translation,
        model: state.translator.model().to_string(),
        timestamp: timestamp(),
    }))
}

/// Handler for `GET /api/health`
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Translation service is running".to_string(),
        model: state.translator.model().to_string(),
        timestamp: timestamp(),
    })
}

/// Handler for `GET /metrics` (Prometheus text format)
pub async fn metrics_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = metrics::gather_metrics().map_err(|e| state.api_error(e))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}

/// Fallback for unknown routes. Reports the full path, including any nest prefix.
pub async fn not_found_handler(method: Method, OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "error": "Not Found",
            "message": format!("Cannot {} {}", method, uri.path()),
        })),
    )
}
