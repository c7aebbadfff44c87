// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    health_handler, metrics_handler, not_found_handler, translate_handler,
    translate_image_handler,
};
use super::middleware::{basic_auth, request_id_layers, BasicAuth};
use crate::config::AppConfig;
use crate::error::Result;
use crate::gemini::GeminiClient;
use crate::translation::{PromptBuilder, Translator};
use axum::extract::DefaultBodyLimit;
use axum::{middleware, routing::{get, post}, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub translator: Translator,
    pub auth: Arc<BasicAuth>,
}

pub fn create_router(config: AppConfig, gemini_client: GeminiClient) -> Result<Router> {
    let auth = BasicAuth::from_config(&config.auth);
    if !auth.is_configured() {
        warn!("AUTH_USER/AUTH_PASS not set: every /api request will be rejected");
    }

    let translator = Translator::new(
        Arc::new(gemini_client),
        PromptBuilder::from_config(&config.prompts),
    );

    let body_limit = config.server.body_limit_bytes;
    let state = AppState {
        config: Arc::new(config),
        translator,
        auth: Arc::new(auth),
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let api = Router::new()
        .route("/translate", post(translate_handler))
        .route("/translate-image", post(translate_image_handler))
        .route("/health", get(health_handler))
        // Unknown /api paths still pass through the auth gate
        .fallback(not_found_handler)
        .layer(middleware::from_fn_with_state(state.clone(), basic_auth));

    let app = Router::new()
        .nest("/api", api)
        .route("/metrics", get(metrics_handler))
        .fallback(not_found_handler)
        // Multipart's built-in 2MB cap is replaced by the configured limit
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
