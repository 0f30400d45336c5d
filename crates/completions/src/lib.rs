//! OpenAI-compatible chat completion client with structured outputs

mod client;
mod error;
mod types;

pub use client::{Auth, ChatClient, DEFAULT_OPENAI_BASE_URL};
pub use error::{CompletionError, Result};
pub use types::{
    ChatRequest, ChatResponse, Choice, JsonSchema, Message, ResponseFormat, ResponseMessage, Role,
};
