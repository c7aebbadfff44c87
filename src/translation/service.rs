// Translation adapter: prompt → Gemini → text
// Author: kelexine (https://github.com/kelexine)

use super::prompt::PromptBuilder;
use super::request::{ImageRequest, TextRequest, TranslationRequest, TranslationResult};
use crate::error::{Result, TranslateError, IMAGE_UPSTREAM_MESSAGE, TEXT_UPSTREAM_MESSAGE};
use crate::gemini::GeminiClient;
use crate::metrics;
use crate::utils::logging::sanitize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Turns validated requests into Darija text using a shared Gemini client.
#[derive(Clone)]
pub struct Translator {
    client: Arc<GeminiClient>,
    prompts: PromptBuilder,
}

impl Translator {
    pub fn new(client: Arc<GeminiClient>, prompts: PromptBuilder) -> Self {
        Self { client, prompts }
    }

    /// Model id reported back to callers
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Translate either kind of request.
    pub async fn translate(&self, request: TranslationRequest) -> Result<TranslationResult> {
        let mode = request.mode();
        let start = Instant::now();

        let result = match &request {
            TranslationRequest::Text(text) => self.translate_text(text).await,
            TranslationRequest::Image(image) => self.translate_image(image).await,
        };

        let outcome = if result.is_ok() { "success" } else { "upstream_failure" };
        metrics::record_translation(mode, outcome, start.elapsed().as_secs_f64());

        result.map(|translation| TranslationResult { translation })
    }

    pub async fn translate_text(&self, request: &TextRequest) -> Result<String> {
        info!("Starting text translation ({} chars)", request.text().chars().count());

        let gemini_request = self.prompts.text_request(request.text());
        debug!("Built text prompt");

        match self.client.generate_text(&gemini_request).await {
            Ok(translation) => {
                info!("Text translation successful ({} chars)", translation.chars().count());
                Ok(translation)
            }
            Err(e) => {
                let detail = sanitize(&e.to_string());
                error!("Text translation failed: {}", detail);
                Err(TranslateError::upstream(TEXT_UPSTREAM_MESSAGE, detail))
            }
        }
    }

    pub async fn translate_image(&self, request: &ImageRequest) -> Result<String> {
        info!(
            "Starting image translation ({} bytes, file: {})",
            request.bytes.len(),
            request.file_name.as_deref().unwrap_or("<unnamed>")
        );

        let gemini_request = self.prompts.image_request(&request.bytes);

        match self.client.generate_text(&gemini_request).await {
            Ok(translation) => {
                info!("Image translation successful ({} chars)", translation.chars().count());
                Ok(translation)
            }
            Err(e) => {
                let detail = sanitize(&e.to_string());
                error!("Image translation failed: {}", detail);
                Err(TranslateError::upstream(IMAGE_UPSTREAM_MESSAGE, detail))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;

    fn offline_translator() -> Translator {
        // No API key: every call fails before touching the network
        let client = GeminiClient::new(&GeminiConfig::default()).unwrap();
        Translator::new(Arc::new(client), PromptBuilder::default())
    }

    #[tokio::test]
    async fn test_text_failure_is_generic() {
        let translator = offline_translator();
        let request = TextRequest::new("hello").unwrap();

        let err = translator.translate_text(&request).await.unwrap_err();
        assert_eq!(err.public_message(), TEXT_UPSTREAM_MESSAGE);
        assert!(err.detail().unwrap().contains("API key is not configured"));
    }

    #[tokio::test]
    async fn test_image_failure_is_generic() {
        let translator = offline_translator();
        let request = TranslationRequest::Image(ImageRequest::new(vec![1u8, 2, 3]));

        let err = translator.translate(request).await.unwrap_err();
        assert_eq!(err.public_message(), IMAGE_UPSTREAM_MESSAGE);
        assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
