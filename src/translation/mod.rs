// Translation pipeline - chunking, language classification and LLM dispatch

pub mod backend;
pub mod chunker;
pub mod classifier;
pub mod executor;
pub mod iso639;
pub mod orchestrator;
pub mod providers;
pub mod types;

#[cfg(test)]
mod mock;

pub use backend::ChatBackend;
pub use classifier::LanguageClassifier;
pub use executor::TranslationExecutor;
pub use orchestrator::Translator;
pub use providers::{AzureOpenAiBuilder, OpenAiBuilder, Provider};
pub use types::*;
