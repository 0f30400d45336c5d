// Backend - the seam between the pipeline and the chat transport

use async_trait::async_trait;
use completions::{ChatClient, ChatRequest, CompletionError};
use serde::de::DeserializeOwned;

/// Anything that can answer a chat completion request with message content
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError>;
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError> {
        ChatClient::complete(self, request).await
    }
}

/// Parse schema-constrained content; no free-form fallback
pub(crate) fn parse_structured<T: DeserializeOwned>(content: &str) -> Result<T, String> {
    serde_json::from_str(content).map_err(|e| format!("{}: {}", e, truncate(content, 200)))
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    struct Sample {
        value: u32,
    }

    #[test]
    fn test_parse_structured() {
        let sample: Sample = parse_structured(r#"{"value": 3}"#).unwrap();
        assert_eq!(sample.value, 3);
    }

    #[test]
    fn test_parse_structured_rejects_prose() {
        let err = parse_structured::<Sample>("Sure! The value is 3.").unwrap_err();
        assert!(err.contains("Sure!"));
    }
}
