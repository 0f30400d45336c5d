//! Chat completion client

use crate::error::{CompletionError, Result};
use crate::types::{ChatRequest, ChatResponse};
use std::fmt;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// How requests are authenticated
#[derive(Clone)]
pub enum Auth {
    /// `Authorization: Bearer <key>` (OpenAI)
    Bearer(String),
    /// `api-key: <key>` header (Azure OpenAI)
    ApiKeyHeader(String),
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Bearer(_) => f.write_str("Bearer(***)"),
            Auth::ApiKeyHeader(_) => f.write_str("ApiKeyHeader(***)"),
        }
    }
}

/// Client for one chat completions endpoint
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    url: String,
    auth: Auth,
}

impl ChatClient {
    /// Client for the public OpenAI API
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::openai_with_base_url(api_key, DEFAULT_OPENAI_BASE_URL)
    }

    /// Client for any OpenAI-compatible API rooted at `base_url`
    pub fn openai_with_base_url(api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            auth: Auth::Bearer(api_key.into()),
        }
    }

    /// Client for an Azure OpenAI deployment
    pub fn azure(endpoint: &str, api_key: impl Into<String>, api_version: &str, deployment: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                endpoint.trim_end_matches('/'),
                deployment,
                api_version
            ),
            auth: Auth::ApiKeyHeader(api_key.into()),
        }
    }

    /// Rebuild the underlying HTTP client with a request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// Full URL requests are posted to
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Send a chat request and return the assistant message content
    pub async fn complete(&self, request: &ChatRequest) -> Result<String> {
        debug!(
            model = %request.model,
            schema = request.schema_name().unwrap_or("none"),
            "sending chat completion"
        );

        let builder = self.client.post(&self.url).json(request);
        let builder = match &self.auth {
            Auth::Bearer(key) => builder.bearer_auth(key),
            Auth::ApiKeyHeader(key) => builder.header("api-key", key),
        };

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat_response: ChatResponse = response.json().await?;
        chat_response.into_content()
    }
}
