// Translation request types and boundary validation
// Author: kelexine (https://github.com/kelexine)

use crate::error::{Result, TranslateError};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

/// Maximum accepted text length, in UTF-16 code units.
pub const MAX_TEXT_CHARS: usize = 5000;

/// Returned for any text that fails validation.
pub const INVALID_TEXT_MESSAGE: &str = "Please provide valid text (max 5000 characters)";

/// Returned when an image upload carries no file.
pub const MISSING_IMAGE_MESSAGE: &str = "Please upload an image";

/// A validated translation request.
#[derive(Debug, Clone)]
pub enum TranslationRequest {
    Text(TextRequest),
    Image(ImageRequest),
}

impl TranslationRequest {
    /// Short label used in logs and metrics.
    pub fn mode(&self) -> &'static str {
        match self {
            TranslationRequest::Text(_) => "text",
            TranslationRequest::Image(_) => "image",
        }
    }
}

/// Text to translate. Only constructible through validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRequest {
    text: String,
}

impl TextRequest {
    /// Validate `text` and wrap it.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if !is_valid_text(&text) {
            return Err(TranslateError::InvalidInput(INVALID_TEXT_MESSAGE.to_string()));
        }
        Ok(Self { text })
    }

    /// Extract and validate the `text` field of a JSON body.
    ///
    /// A missing field or a non-string value is rejected like empty text.
    pub fn from_json(body: &Value) -> Result<Self> {
        match body.get("text").and_then(Value::as_str) {
            Some(text) => Self::new(text),
            None => Err(TranslateError::InvalidInput(INVALID_TEXT_MESSAGE.to_string())),
        }
    }

    /// The original text, untrimmed.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// An uploaded image. The bytes are opaque; format and size are left to the
/// remote API and the server body limit.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub bytes: Bytes,
    pub file_name: Option<String>,
}

impl ImageRequest {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = file_name;
        self
    }
}

/// Result of a translation: plain Darija text in Arabic script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationResult {
    pub translation: String,
}

/// Non-empty after trimming and at most [`MAX_TEXT_CHARS`] UTF-16 code units.
///
/// Length is measured on the untrimmed input. Characters outside the BMP
/// count twice; a byte order mark counts as blank.
pub fn is_valid_text(text: &str) -> bool {
    !trim_blank(text).is_empty() && text.encode_utf16().count() <= MAX_TEXT_CHARS
}

fn trim_blank(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_empty_and_whitespace_rejected() {
        assert!(!is_valid_text(""));
        assert!(!is_valid_text("   \n\t "));
        assert!(TextRequest::new(" ").is_err());
    }

    #[test]
    fn test_length_boundary() {
        assert!(is_valid_text(&"a".repeat(MAX_TEXT_CHARS)));
        assert!(!is_valid_text(&"a".repeat(MAX_TEXT_CHARS + 1)));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 5000 Arabic letters are 10000 bytes of UTF-8
        let arabic = "س".repeat(MAX_TEXT_CHARS);
        assert!(arabic.len() > MAX_TEXT_CHARS);
        assert!(is_valid_text(&arabic));
    }

    #[test]
    fn test_length_counts_utf16_units() {
        // Emoji sit outside the BMP and take two units each
        let half = "😀".repeat(MAX_TEXT_CHARS / 2);
        assert!(is_valid_text(&half));
        assert!(!is_valid_text(&format!("{}a", half)));
        assert!(!is_valid_text(&"😀".repeat(MAX_TEXT_CHARS)));
    }

    #[test]
    fn test_byte_order_mark_is_blank() {
        assert!(!is_valid_text("\u{FEFF}"));
        assert!(!is_valid_text(" \u{FEFF}\n"));
        assert!(is_valid_text("\u{FEFF}salam"));
    }

    #[test]
    fn test_length_includes_surrounding_whitespace() {
        let padded = format!(" {} ", "a".repeat(MAX_TEXT_CHARS - 1));
        assert!(!is_valid_text(&padded));
    }

    #[test]
    fn test_from_json() {
        let req = TextRequest::from_json(&json!({"text": "  hello  "})).unwrap();
        assert_eq!(req.text(), "  hello  ");

        let err = TextRequest::from_json(&json!({"text": 42})).unwrap_err();
        assert!(matches!(err, TranslateError::InvalidInput(ref msg) if msg == INVALID_TEXT_MESSAGE));

        assert!(TextRequest::from_json(&json!({})).is_err());
        assert!(TextRequest::from_json(&json!(["hello"])).is_err());
        assert!(TextRequest::from_json(&json!({"text": null})).is_err());
    }

    #[test]
    fn test_image_request_accepts_any_bytes() {
        let req = TranslationRequest::Image(ImageRequest::new(vec![0u8, 1, 2]));
        assert_eq!(req.mode(), "image");
    }

    proptest! {
        #[test]
        fn prop_non_blank_within_limit_accepted(s in "[a-zA-Z0-9 ]{0,200}") {
            prop_assert_eq!(is_valid_text(&s), !s.trim().is_empty());
        }

        #[test]
        fn prop_over_limit_rejected(extra in 1usize..100) {
            let text = "x".repeat(MAX_TEXT_CHARS + extra);
            prop_assert!(!is_valid_text(&text));
        }
    }
}
