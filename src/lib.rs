//! LLM-backed text translation and language detection.
//!
//! Long input is split into bounded chunks, chunks the model reports as
//! multi-language are split further, and every piece is translated
//! concurrently before being joined back in original order.
//!
//! ```no_run
//! use aitranslator::{OpenAiBuilder, Provider};
//!
//! # async fn run() -> aitranslator::Result<()> {
//! let translator = OpenAiBuilder::new().api_key("sk-...").build()?;
//! let french = translator.translate("Good morning, everyone.", "fr").await?;
//! let detected = translator.detect_language(&french).await?;
//! println!("{} -> {}", french, detected);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod translation;

pub use error::{Result, TranslatorError};
pub use translation::{
    AzureOpenAiBuilder, ChatBackend, DetectedLanguage, ModelConfig, ModelForTranslator,
    OpenAiBuilder, Provider, TextChunk, TranslationRequest, Translator,
};
