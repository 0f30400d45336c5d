// Executor - translates one chunk per LLM round trip

use super::backend::{ChatBackend, parse_structured};
use super::iso639;
use super::types::{ModelForTranslator, TextChunk};
use crate::error::{Result, TranslatorError};
use completions::{ChatRequest, Message, ResponseFormat};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

pub(crate) const TRANSLATE_SCHEMA: &str = "translation";

#[derive(Deserialize)]
struct TranslateFormat {
    translated_text: String,
}

pub struct TranslationExecutor<'a> {
    backend: &'a dyn ChatBackend,
    model: ModelForTranslator,
}

impl<'a> TranslationExecutor<'a> {
    pub fn new(backend: &'a dyn ChatBackend, model: ModelForTranslator) -> Self {
        Self { backend, model }
    }

    /// Translate `chunk` into `to_language`.
    ///
    /// The model is told to emit the translation only. Compliance is a prompt
    /// contract; the schema only guarantees a single string comes back.
    pub async fn translate_chunk(&self, chunk: &TextChunk, to_language: &str) -> Result<String> {
        let request = ChatRequest::new(
            self.model.as_str(),
            vec![
                Message::system(self.build_translation_prompt(to_language)),
                Message::user(chunk.content.clone()),
            ],
        )
        .with_response_format(ResponseFormat::json_schema(
            TRANSLATE_SCHEMA,
            json!({
                "type": "object",
                "properties": {
                    "translated_text": { "type": "string" }
                },
                "required": ["translated_text"],
                "additionalProperties": false
            }),
        ));

        let content = self.backend.complete(&request).await?;
        let parsed: TranslateFormat =
            parse_structured(&content).map_err(TranslatorError::TranslationParse)?;

        debug!(
            chunk = chunk.sequence_index,
            source_chars = chunk.len(),
            translated_chars = parsed.translated_text.chars().count(),
            "translated chunk"
        );

        Ok(parsed.translated_text)
    }

    fn build_translation_prompt(&self, to_language: &str) -> String {
        let target = match iso639::language_name(to_language) {
            Some(name) => format!("{} ({})", name, to_language.trim()),
            None => to_language.to_string(),
        };
        format!(
            "You are a language translator. Translate the text provided by the user into {}. \
             Output only the translation, with no commentary such as \"Here is the translated text\".",
            target
        )
    }
}
