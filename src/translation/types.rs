// Core types for the translation pipeline

use crate::error::{Result, TranslatorError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_MAX_CHUNK_LENGTH: usize = 1000;
pub const DEFAULT_MAX_MINI_CHUNK_LENGTH: usize = 128;

/// A contiguous slice of input text processed as one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    pub content: String,
    pub sequence_index: usize,
}

impl TextChunk {
    pub fn new(content: impl Into<String>, sequence_index: usize) -> Self {
        Self {
            content: content.into(),
            sequence_index,
        }
    }

    /// Length in characters, the unit chunk bounds are measured in
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Number of distinct languages the LLM found in one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageCount {
    pub chunk_index: usize,
    pub count: u32,
}

impl LanguageCount {
    pub fn is_mixed(&self) -> bool {
        self.count > 1
    }
}

/// Result of language detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedLanguage {
    pub iso_code: String,
    pub display_name: String,
}

impl fmt::Display for DetectedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.iso_code)
    }
}

/// Models that support schema-constrained responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ModelForTranslator {
    #[default]
    BestBig,
    BestSmall,
    Gpt4o,
    Gpt4oMini,
}

impl ModelForTranslator {
    pub const ALL: [ModelForTranslator; 4] = [
        ModelForTranslator::BestBig,
        ModelForTranslator::BestSmall,
        ModelForTranslator::Gpt4o,
        ModelForTranslator::Gpt4oMini,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelForTranslator::BestBig => "gpt-4o-2024-08-06",
            ModelForTranslator::BestSmall => "gpt-4o-mini-2024-07-18",
            ModelForTranslator::Gpt4o => "gpt-4o",
            ModelForTranslator::Gpt4oMini => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for ModelForTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelForTranslator {
    type Err = TranslatorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| TranslatorError::InvalidModelIdentifier(s.to_string()))
    }
}

impl TryFrom<String> for ModelForTranslator {
    type Error = TranslatorError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ModelForTranslator> for String {
    fn from(model: ModelForTranslator) -> Self {
        model.as_str().to_string()
    }
}

/// Model and chunk bounds for one translator session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelConfig {
    identifier: ModelForTranslator,
    max_chunk_length: usize,
    max_mini_chunk_length: usize,
}

impl ModelConfig {
    pub fn new(
        identifier: ModelForTranslator,
        max_chunk_length: usize,
        max_mini_chunk_length: usize,
    ) -> Result<Self> {
        if max_chunk_length == 0 {
            return Err(TranslatorError::not_positive("max_chunk_length"));
        }
        if max_mini_chunk_length == 0 {
            return Err(TranslatorError::not_positive("max_mini_chunk_length"));
        }
        Ok(Self {
            identifier,
            max_chunk_length,
            max_mini_chunk_length,
        })
    }

    pub fn identifier(&self) -> ModelForTranslator {
        self.identifier
    }

    pub fn max_chunk_length(&self) -> usize {
        self.max_chunk_length
    }

    pub fn max_mini_chunk_length(&self) -> usize {
        self.max_mini_chunk_length
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            identifier: ModelForTranslator::default(),
            max_chunk_length: DEFAULT_MAX_CHUNK_LENGTH,
            max_mini_chunk_length: DEFAULT_MAX_MINI_CHUNK_LENGTH,
        }
    }
}

/// One translation invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    source_text: String,
    target_language: String,
    model: ModelForTranslator,
}

impl TranslationRequest {
    pub fn new(
        source_text: impl Into<String>,
        target_language: impl Into<String>,
        model: ModelForTranslator,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            target_language: target_language.into(),
            model,
        }
    }

    /// Use a different model for this request only
    pub fn with_model(mut self, model: ModelForTranslator) -> Self {
        self.model = model;
        self
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    pub fn model(&self) -> ModelForTranslator {
        self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_parsing() {
        assert_eq!(
            "gpt-4o-2024-08-06".parse::<ModelForTranslator>().unwrap(),
            ModelForTranslator::BestBig
        );
        assert_eq!(
            "gpt-4o-mini".parse::<ModelForTranslator>().unwrap(),
            ModelForTranslator::Gpt4oMini
        );
        match "gpt-3.5-turbo".parse::<ModelForTranslator>() {
            Err(TranslatorError::InvalidModelIdentifier(name)) => assert_eq!(name, "gpt-3.5-turbo"),
            other => panic!("expected invalid model, got {:?}", other),
        }
    }

    #[test]
    fn test_model_round_trips_through_serde() {
        let json = serde_json::to_string(&ModelForTranslator::BestSmall).unwrap();
        assert_eq!(json, "\"gpt-4o-mini-2024-07-18\"");
        assert!(serde_json::from_str::<ModelForTranslator>("\"davinci\"").is_err());
    }

    #[test]
    fn test_model_config_rejects_zero_bounds() {
        assert!(ModelConfig::new(ModelForTranslator::BestBig, 0, 128).is_err());
        let err = ModelConfig::new(ModelForTranslator::BestBig, 1000, 0).unwrap_err();
        assert_eq!(err.to_string(), "max_mini_chunk_length must be greater than zero");
    }

    #[test]
    fn test_model_config_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.identifier(), ModelForTranslator::BestBig);
        assert_eq!(config.max_chunk_length(), 1000);
        assert_eq!(config.max_mini_chunk_length(), 128);
    }

    #[test]
    fn test_request_model_override() {
        let request = TranslationRequest::new("hola", "en", ModelForTranslator::BestBig)
            .with_model(ModelForTranslator::BestSmall);
        assert_eq!(request.model(), ModelForTranslator::BestSmall);
        assert_eq!(request.source_text(), "hola");
        assert_eq!(request.target_language(), "en");
    }

    #[test]
    fn test_language_count_mixed() {
        assert!(!LanguageCount { chunk_index: 0, count: 1 }.is_mixed());
        assert!(LanguageCount { chunk_index: 0, count: 2 }.is_mixed());
    }
}
