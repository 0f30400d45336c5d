//! Error types for the chat transport

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompletionError>;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat completion request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("chat completion returned no content")]
    EmptyResponse,

    #[error("model refused the request: {0}")]
    Refusal(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
