// Providers - session construction for each supported LLM backend

use super::backend::ChatBackend;
use super::orchestrator::Translator;
use super::types::{DEFAULT_MAX_CHUNK_LENGTH, DEFAULT_MAX_MINI_CHUNK_LENGTH, ModelConfig, ModelForTranslator};
use crate::error::{Result, TranslatorError};
use completions::ChatClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Capability every backend variant provides to build a [`Translator`]
pub trait Provider {
    /// Validate credentials and create the LLM client
    fn configure_credentials(&self) -> Result<Arc<dyn ChatBackend>>;

    /// Validate the model identifier and chunk bounds
    fn configure_model(&self) -> Result<ModelConfig>;

    fn build(self) -> Result<Translator>
    where
        Self: Sized,
    {
        let backend = self.configure_credentials()?;
        let config = self.configure_model()?;
        Ok(Translator::new(config).with_backend(backend))
    }
}

/// Model settings shared by every builder
#[derive(Debug, Clone)]
struct ModelSettings {
    model: Option<String>,
    max_chunk_length: usize,
    max_mini_chunk_length: usize,
    timeout: Option<Duration>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: None,
            max_chunk_length: DEFAULT_MAX_CHUNK_LENGTH,
            max_mini_chunk_length: DEFAULT_MAX_MINI_CHUNK_LENGTH,
            timeout: None,
        }
    }
}

impl ModelSettings {
    fn resolve(&self) -> Result<ModelConfig> {
        let identifier = match &self.model {
            Some(name) => name.parse()?,
            None => ModelForTranslator::default(),
        };
        ModelConfig::new(identifier, self.max_chunk_length, self.max_mini_chunk_length)
    }

    fn apply_timeout(&self, client: ChatClient) -> Result<ChatClient> {
        match self.timeout {
            Some(timeout) => Ok(client.with_timeout(timeout)?),
            None => Ok(client),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

macro_rules! model_setters {
    () => {
        /// Model identifier; must be one of [`ModelForTranslator`]
        pub fn model(mut self, model: impl Into<String>) -> Self {
            self.settings.model = Some(model.into());
            self
        }

        pub fn max_chunk_length(mut self, length: usize) -> Self {
            self.settings.max_chunk_length = length;
            self
        }

        pub fn max_mini_chunk_length(mut self, length: usize) -> Self {
            self.settings.max_mini_chunk_length = length;
            self
        }

        /// Transport request timeout; none by default
        pub fn timeout(mut self, timeout: Duration) -> Self {
            self.settings.timeout = Some(timeout);
            self
        }
    };
}

/// Direct API-key authenticated OpenAI backend
#[derive(Debug, Clone, Default)]
pub struct OpenAiBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    settings: ModelSettings,
}

impl OpenAiBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Point at an OpenAI-compatible API other than api.openai.com
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    model_setters!();
}

impl Provider for OpenAiBuilder {
    fn configure_credentials(&self) -> Result<Arc<dyn ChatBackend>> {
        let api_key = non_empty(&self.api_key).ok_or(TranslatorError::EmptyCredential)?;

        let client = match non_empty(&self.base_url) {
            Some(base_url) => ChatClient::openai_with_base_url(api_key, base_url),
            None => ChatClient::openai(api_key),
        };
        let client = self.settings.apply_timeout(client)?;

        debug!(url = client.url(), "configured OpenAI client");
        Ok(Arc::new(client))
    }

    fn configure_model(&self) -> Result<ModelConfig> {
        self.settings.resolve()
    }
}

/// Azure OpenAI managed-endpoint backend
#[derive(Debug, Clone, Default)]
pub struct AzureOpenAiBuilder {
    endpoint: Option<String>,
    api_key: Option<String>,
    api_version: Option<String>,
    deployment: Option<String>,
    settings: ModelSettings,
}

impl AzureOpenAiBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    pub fn deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = Some(deployment.into());
        self
    }

    model_setters!();
}

impl Provider for AzureOpenAiBuilder {
    fn configure_credentials(&self) -> Result<Arc<dyn ChatBackend>> {
        let api_key = non_empty(&self.api_key).ok_or(TranslatorError::EmptyCredential)?;
        let deployment =
            non_empty(&self.deployment).ok_or_else(|| TranslatorError::required("deployment"))?;
        let api_version =
            non_empty(&self.api_version).ok_or_else(|| TranslatorError::required("api_version"))?;
        let endpoint =
            non_empty(&self.endpoint).ok_or_else(|| TranslatorError::required("endpoint"))?;

        let client = ChatClient::azure(endpoint, api_key, api_version, deployment);
        let client = self.settings.apply_timeout(client)?;

        debug!(url = client.url(), "configured Azure OpenAI client");
        Ok(Arc::new(client))
    }

    fn configure_model(&self) -> Result<ModelConfig> {
        self.settings.resolve()
    }
}
