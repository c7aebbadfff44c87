//! The translation request pipeline.
//!
//! Input validation (`request`) → prompt construction (`prompt`) → model
//! invocation and response normalization (`service`).
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod prompt;
pub mod request;
pub mod service;

pub use prompt::{PromptBuilder, PromptTemplate};
pub use request::{ImageRequest, TextRequest, TranslationRequest, TranslationResult};
pub use service::Translator;
