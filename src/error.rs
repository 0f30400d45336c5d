// Error types for aitranslator

use completions::CompletionError;
use thiserror::Error;

/// Result type for translator operations
pub type Result<T> = std::result::Result<T, TranslatorError>;

/// Errors surfaced by translation and language detection
#[derive(Error, Debug)]
pub enum TranslatorError {
    #[error("no LLM client configured; provide an API key before translating")]
    MissingCredential,

    #[error("API key must not be empty")]
    EmptyCredential,

    #[error("unsupported model identifier: {0}")]
    InvalidModelIdentifier(String),

    #[error("{field} {reason}")]
    InvalidConfiguration {
        field: &'static str,
        reason: &'static str,
    },

    #[error("language classification failed: {0}")]
    ClassificationParse(String),

    #[error("translation response could not be parsed: {0}")]
    TranslationParse(String),

    #[error("LLM transport error: {0}")]
    Transport(#[from] CompletionError),

    #[error("failed to start blocking runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("blocking call made from inside an async runtime; use the async API instead")]
    NestedRuntime,
}

impl TranslatorError {
    pub(crate) fn required(field: &'static str) -> Self {
        TranslatorError::InvalidConfiguration {
            field,
            reason: "is required",
        }
    }

    pub(crate) fn not_positive(field: &'static str) -> Self {
        TranslatorError::InvalidConfiguration {
            field,
            reason: "must be greater than zero",
        }
    }
}
