// Gemini API client
// Author: kelexine (https://github.com/kelexine)

use super::{GeminiError, BAD_FINISH_REASONS};
use crate::config::GeminiConfig;
use crate::error::{Result, TranslateError};
use crate::metrics;
use crate::models::gemini::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};
use crate::utils::logging::sanitize;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Client for the Google Gemini `generateContent` API.
///
/// Built once at start-up and shared by every request. Each call is a single
/// best-effort attempt; failures are returned to the caller untouched.
pub struct GeminiClient {
    http_client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new Gemini client with a pooled HTTP connection.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .use_rustls_tls();

        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http_client = builder
            .build()
            .map_err(|e| TranslateError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created HTTP client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    /// Model id every request is sent to
    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn has_api_key(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Call Gemini `generateContent` API (blocking).
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> std::result::Result<GenerateContentResponse, GeminiError> {
        if !self.has_api_key() {
            return Err(GeminiError::MissingApiKey);
        }

        let url = self.endpoint();
        debug!("Calling generateContent API for model: {}", self.config.model);

        let start = Instant::now();
        let result = self.send(&url, request).await;

        let status = match &result {
            Ok(_) => 200,
            Err(GeminiError::Status { status, .. }) => *status,
            Err(_) => 0,
        };
        metrics::record_gemini_call(&self.config.model, status, start.elapsed().as_secs_f64());

        result
    }

    async fn send(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> std::result::Result<GenerateContentResponse, GeminiError> {
        let response = self
            .http_client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!(
                "Gemini API error: HTTP {} - Response body: {}",
                status,
                sanitize(&response_text)
            );
            let message = Self::extract_error_message(&response_text)
                .unwrap_or_else(|| response_text.clone());
            return Err(GeminiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        debug!(
            "Raw Gemini response (first 500 chars): {}",
            response_text.chars().take(500).collect::<String>()
        );

        let parsed: GenerateContentResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            e
        })?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Token usage: prompt={:?} candidates={:?} total={:?}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        Ok(parsed)
    }

    /// Run `request` and return the trimmed answer text of the first candidate.
    pub async fn generate_text(
        &self,
        request: &GenerateContentRequest,
    ) -> std::result::Result<String, GeminiError> {
        let response = self.generate_content(request).await?;
        Self::extract_text(&response)
    }

    /// Normalize a response into plain text. Blocked prompts and missing
    /// candidates fail; a candidate without text yields an empty string.
    pub fn extract_text(response: &GenerateContentResponse) -> std::result::Result<String, GeminiError> {
        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            return Err(GeminiError::Blocked(reason.clone()));
        }

        let candidate = response.candidates.first().ok_or(GeminiError::NoCandidates)?;

        if let Some(reason) = candidate.finish_reason.as_deref() {
            if BAD_FINISH_REASONS.contains(&reason) {
                return Err(GeminiError::Blocked(reason.to_string()));
            }
        }

        let text = response.first_candidate_text().unwrap_or_default();
        Ok(text.trim().to_string())
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        let parsed: ApiErrorResponse = serde_json::from_str(response_text).ok()?;
        parsed.error.message.or(parsed.error.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &str) -> GenerateContentResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_extract_text_trims() {
        let resp = response(r#"{"candidates":[{"content":{"parts":[{"text":"  مرحبا بيك \n"}]},"finishReason":"STOP"}]}"#);
        assert_eq!(GeminiClient::extract_text(&resp).unwrap(), "مرحبا بيك");
    }

    #[test]
    fn test_extract_text_no_candidates() {
        let resp = response(r#"{"candidates":[]}"#);
        assert!(matches!(
            GeminiClient::extract_text(&resp),
            Err(GeminiError::NoCandidates)
        ));
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let resp = response(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        assert!(matches!(
            GeminiClient::extract_text(&resp),
            Err(GeminiError::Blocked(reason)) if reason == "SAFETY"
        ));
    }

    #[test]
    fn test_extract_text_bad_finish_reason() {
        let resp = response(r#"{"candidates":[{"content":{"parts":[{"text":"partial"}]},"finishReason":"RECITATION"}]}"#);
        assert!(GeminiClient::extract_text(&resp).is_err());
    }

    #[test]
    fn test_extract_text_blank_candidate_is_empty() {
        let resp = response(r#"{"candidates":[{"content":{"parts":[{"text":"   "}]},"finishReason":"STOP"}]}"#);
        assert_eq!(GeminiClient::extract_text(&resp).unwrap(), "");

        // Truncated before any text was produced
        let resp = response(r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#);
        assert_eq!(GeminiClient::extract_text(&resp).unwrap(), "");
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error":{"code":403,"message":"Permission denied","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(
            GeminiClient::extract_error_message(body).as_deref(),
            Some("Permission denied")
        );
        assert!(GeminiClient::extract_error_message("<html>bad gateway</html>").is_none());
    }

    #[test]
    fn test_endpoint_format() {
        let config = GeminiConfig {
            api_base_url: "http://localhost:1234/v1beta/".to_string(),
            ..GeminiConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:1234/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_skips_network() {
        let client = GeminiClient::new(&GeminiConfig::default()).unwrap();
        let request = GenerateContentRequest::user(vec![crate::models::Part::text("hi")]);

        assert!(!client.has_api_key());
        assert!(matches!(
            client.generate_content(&request).await,
            Err(GeminiError::MissingApiKey)
        ));
    }
}
