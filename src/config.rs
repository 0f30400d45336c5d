//! Configuration file support for translator sessions

use crate::translation::types::{DEFAULT_MAX_CHUNK_LENGTH, DEFAULT_MAX_MINI_CHUNK_LENGTH, ModelForTranslator};
use crate::translation::{AzureOpenAiBuilder, OpenAiBuilder, Provider, Translator};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const AZURE_OPENAI_API_KEY_ENV: &str = "AZURE_OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_chunk_length")]
    pub max_chunk_length: usize,

    #[serde(default = "default_max_mini_chunk_length")]
    pub max_mini_chunk_length: usize,

    /// Transport request timeout; unset means no timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAi {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    Azure {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_version: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        deployment: Option<String>,
    },
}

// Defaults

fn default_model() -> String {
    ModelForTranslator::default().as_str().to_string()
}

fn default_max_chunk_length() -> usize {
    DEFAULT_MAX_CHUNK_LENGTH
}

fn default_max_mini_chunk_length() -> usize {
    DEFAULT_MAX_MINI_CHUNK_LENGTH
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::OpenAi {
            api_key: None,
            base_url: None,
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_chunk_length: default_max_chunk_length(),
            max_mini_chunk_length: default_max_mini_chunk_length(),
            timeout_secs: None,
            provider: ProviderConfig::default(),
        }
    }
}

impl TranslatorConfig {
    /// `~/.config/aitranslator/config.toml` (platform equivalent)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("aitranslator").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: TranslatorConfig = toml::from_str(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load `path` if given, else the default path if it exists, else defaults
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(default) => Self::from_file(default),
                None => Ok(Self::default()),
            },
        }
    }

    /// Fill a missing API key from the process environment
    pub fn with_env_fallbacks(self) -> Self {
        self.with_fallbacks_from(|name| std::env::var(name).ok())
    }

    fn with_fallbacks_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let (api_key, env_name) = match &mut self.provider {
            ProviderConfig::OpenAi { api_key, .. } => (api_key, OPENAI_API_KEY_ENV),
            ProviderConfig::Azure { api_key, .. } => (api_key, AZURE_OPENAI_API_KEY_ENV),
        };
        if api_key.as_deref().is_none_or(str::is_empty) {
            if let Some(value) = lookup(env_name) {
                *api_key = Some(value);
            }
        }
        self
    }

    /// Build a translator session from this configuration
    pub fn build(&self) -> crate::Result<Translator> {
        let timeout = self.timeout_secs.map(Duration::from_secs);

        match &self.provider {
            ProviderConfig::OpenAi { api_key, base_url } => {
                let mut builder = OpenAiBuilder::new()
                    .model(&self.model)
                    .max_chunk_length(self.max_chunk_length)
                    .max_mini_chunk_length(self.max_mini_chunk_length);
                if let Some(key) = api_key {
                    builder = builder.api_key(key);
                }
                if let Some(url) = base_url {
                    builder = builder.base_url(url);
                }
                if let Some(timeout) = timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build()
            }
            ProviderConfig::Azure {
                endpoint,
                api_key,
                api_version,
                deployment,
            } => {
                let mut builder = AzureOpenAiBuilder::new()
                    .model(&self.model)
                    .max_chunk_length(self.max_chunk_length)
                    .max_mini_chunk_length(self.max_mini_chunk_length);
                if let Some(endpoint) = endpoint {
                    builder = builder.endpoint(endpoint);
                }
                if let Some(key) = api_key {
                    builder = builder.api_key(key);
                }
                if let Some(version) = api_version {
                    builder = builder.api_version(version);
                }
                if let Some(deployment) = deployment {
                    builder = builder.deployment(deployment);
                }
                if let Some(timeout) = timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build()
            }
        }
    }
}
