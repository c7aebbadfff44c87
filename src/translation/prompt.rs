// Prompt construction for text and image translation
// Author: kelexine (https://github.com/kelexine)

use crate::config::PromptConfig;
use crate::models::gemini::{GenerateContentRequest, InlineData, Part};
use base64::Engine;
use tracing::warn;

/// Substitution marker replaced by the user's text.
pub const TEXT_MARKER: &str = "{TEXT}";

/// Images are always declared as PNG, whatever their real format.
pub const IMAGE_MIME_TYPE: &str = "image/png";

pub const DEFAULT_TEXT_TEMPLATE: &str = "Translate the following text to Darija (Moroccan Arabic dialect).\n\
Only provide the Darija translation, nothing else. Use authentic Darija language and the writing should be in arabic letters.\n\
\n\
text: \"{TEXT}\"\n\
\n\
Darija translation:";

pub const DEFAULT_IMAGE_PROMPT: &str = "You are an OCR and translation assistant.\n\
1. Extract all readable text from the image.\n\
2. Translate that text to Moroccan Darija.\n\
3. Use Arabic letters only.\n\
4. Do NOT add explanations, ONLY the translation.";

/// A prompt with a single `{TEXT}` substitution point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn has_marker(&self) -> bool {
        self.0.contains(TEXT_MARKER)
    }

    /// Replace the first marker with `text`. Later markers are left as-is.
    pub fn fill(&self, text: &str) -> String {
        self.0.replacen(TEXT_MARKER, text, 1)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT_TEMPLATE)
    }
}

/// Builds Gemini requests from validated input.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    text_template: PromptTemplate,
    image_instruction: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            text_template: PromptTemplate::default(),
            image_instruction: DEFAULT_IMAGE_PROMPT.to_string(),
        }
    }
}

impl PromptBuilder {
    /// Use configured templates, falling back to the defaults when unset.
    pub fn from_config(config: &PromptConfig) -> Self {
        let text_template = match config.text_template.as_deref().filter(|t| !t.is_empty()) {
            Some(template) => {
                let template = PromptTemplate::new(template);
                if !template.has_marker() {
                    warn!(
                        "Configured text template has no {} marker; user text will not be sent",
                        TEXT_MARKER
                    );
                }
                template
            }
            None => PromptTemplate::default(),
        };

        let image_instruction = config
            .image_template
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_PROMPT.to_string());

        Self {
            text_template,
            image_instruction,
        }
    }

    pub fn text_prompt(&self, text: &str) -> String {
        self.text_template.fill(text)
    }

    pub fn image_instruction(&self) -> &str {
        &self.image_instruction
    }

    /// Single text part carrying the filled template.
    pub fn text_request(&self, text: &str) -> GenerateContentRequest {
        GenerateContentRequest::user(vec![Part::text(self.text_prompt(text))])
    }

    /// Image part first, then the instruction.
    pub fn image_request(&self, image: &[u8]) -> GenerateContentRequest {
        let data = base64::engine::general_purpose::STANDARD.encode(image);

        GenerateContentRequest::user(vec![
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: IMAGE_MIME_TYPE.to_string(),
                    data,
                },
            },
            Part::text(self.image_instruction.clone()),
        ])
    }
}
