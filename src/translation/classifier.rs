// Classifier - asks the LLM which and how many languages a text contains

use super::backend::{ChatBackend, parse_structured};
use super::chunker::first_n_words;
use super::iso639;
use super::types::{DetectedLanguage, LanguageCount, ModelForTranslator, TextChunk};
use crate::error::{Result, TranslatorError};
use completions::{ChatRequest, Message, ResponseFormat};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

pub(crate) const DETECT_SCHEMA: &str = "text_language";
pub(crate) const COUNT_SCHEMA: &str = "language_count";

#[derive(Deserialize)]
struct TextLanguageFormat {
    iso_code: String,
}

#[derive(Deserialize)]
struct LanguageCountFormat {
    language_count: u32,
}

/// Language detection and counting against one backend and model
pub struct LanguageClassifier<'a> {
    backend: &'a dyn ChatBackend,
    model: ModelForTranslator,
    sample_words: usize,
}

impl<'a> LanguageClassifier<'a> {
    pub fn new(backend: &'a dyn ChatBackend, model: ModelForTranslator, sample_words: usize) -> Self {
        Self {
            backend,
            model,
            sample_words,
        }
    }

    /// Detect the dominant language from the first words of `text`
    pub async fn detect_language(&self, text: &str) -> Result<DetectedLanguage> {
        let sample = first_n_words(text, self.sample_words);

        let request = ChatRequest::new(
            self.model.as_str(),
            vec![
                Message::system(self.build_detection_prompt()),
                Message::user(sample),
            ],
        )
        .with_response_format(ResponseFormat::json_schema(
            DETECT_SCHEMA,
            json!({
                "type": "object",
                "properties": {
                    "iso_code": { "type": "string" }
                },
                "required": ["iso_code"],
                "additionalProperties": false
            }),
        ));

        let content = self.backend.complete(&request).await?;
        let parsed: TextLanguageFormat =
            parse_structured(&content).map_err(TranslatorError::ClassificationParse)?;

        let iso_code = parsed.iso_code.trim().to_ascii_lowercase();
        let display_name = iso639::language_name(&iso_code).ok_or_else(|| {
            TranslatorError::ClassificationParse(format!(
                "unrecognized ISO 639-1 code {:?}",
                parsed.iso_code
            ))
        })?;

        debug!(iso_code = %iso_code, "detected language");

        Ok(DetectedLanguage {
            iso_code,
            display_name: display_name.to_string(),
        })
    }

    /// Best-effort count of distinct languages in one chunk
    pub async fn count_languages(&self, chunk: &TextChunk) -> Result<LanguageCount> {
        let request = ChatRequest::new(
            self.model.as_str(),
            vec![
                Message::system(
                    "You are a text language counter. Count how many distinct natural \
                     languages appear in the text provided by the user.",
                ),
                Message::user(chunk.content.clone()),
            ],
        )
        .with_response_format(ResponseFormat::json_schema(
            COUNT_SCHEMA,
            json!({
                "type": "object",
                "properties": {
                    "language_count": { "type": "integer" }
                },
                "required": ["language_count"],
                "additionalProperties": false
            }),
        ));

        let content = self.backend.complete(&request).await?;
        let parsed: LanguageCountFormat =
            parse_structured(&content).map_err(TranslatorError::ClassificationParse)?;

        let count = if parsed.language_count == 0 {
            warn!(chunk = chunk.sequence_index, "model counted zero languages, treating as one");
            1
        } else {
            parsed.language_count
        };

        debug!(chunk = chunk.sequence_index, count, "counted languages");

        Ok(LanguageCount {
            chunk_index: chunk.sequence_index,
            count,
        })
    }

    fn build_detection_prompt(&self) -> String {
        format!(
            "You are a language detector. Return only the ISO 639-1 code of the text \
             provided by the user. Valid codes:\n{}",
            iso639::prompt_listing()
        )
    }
}
