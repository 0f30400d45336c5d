// Orchestrator - chunks, classifies, fans out translations and reassembles

use super::backend::ChatBackend;
use super::chunker;
use super::classifier::LanguageClassifier;
use super::executor::TranslationExecutor;
use super::types::{
    DetectedLanguage, LanguageCount, ModelConfig, ModelForTranslator, TextChunk, TranslationRequest,
};
use crate::error::{Result, TranslatorError};
use futures_util::future::try_join_all;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// A translator session: immutable model config plus an optional LLM client.
///
/// Every call is a stateless request-response pipeline; the session can be
/// shared across tasks.
#[derive(Clone)]
pub struct Translator {
    config: ModelConfig,
    backend: Option<Arc<dyn ChatBackend>>,
}

impl Translator {
    /// Session without a client; every LLM operation fails with
    /// [`TranslatorError::MissingCredential`] until one is attached
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            backend: None,
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn ChatBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn model(&self) -> ModelForTranslator {
        self.config.identifier()
    }

    /// Request for `text` using the session model
    pub fn request(&self, text: impl Into<String>, to_language: impl Into<String>) -> TranslationRequest {
        TranslationRequest::new(text, to_language, self.model())
    }

    fn backend(&self) -> Result<&dyn ChatBackend> {
        self.backend
            .as_deref()
            .ok_or(TranslatorError::MissingCredential)
    }

    /// Translate `text` into the language with ISO 639-1 code `to_language`
    pub async fn translate(&self, text: &str, to_language: &str) -> Result<String> {
        self.translate_request(&self.request(text, to_language)).await
    }

    pub async fn translate_request(&self, request: &TranslationRequest) -> Result<String> {
        let backend = self.backend()?;
        let classifier = LanguageClassifier::new(backend, request.model(), self.config.max_chunk_length());
        let executor = TranslationExecutor::new(backend, request.model());

        let chunks = chunker::split(request.source_text(), self.config.max_chunk_length());

        let counts = try_join_all(chunks.iter().map(|chunk| classifier.count_languages(chunk))).await?;

        let tasks = self.plan(&chunks, &counts);

        debug!(
            chunks = chunks.len(),
            mixed = counts.iter().filter(|c| c.is_mixed()).count(),
            tasks = tasks.len(),
            "planned translation"
        );

        let translated = try_join_all(
            tasks
                .iter()
                .map(|task| executor.translate_chunk(task, request.target_language())),
        )
        .await?;

        info!(
            model = %request.model(),
            to = request.target_language(),
            tasks = tasks.len(),
            "translation complete"
        );

        Ok(translated.join(" "))
    }

    /// Translation tasks in registration order. Chunks counted as
    /// multi-language are replaced in place by their finer sub-chunks.
    pub(crate) fn plan(&self, chunks: &[TextChunk], counts: &[LanguageCount]) -> Vec<TextChunk> {
        let mut tasks = Vec::with_capacity(chunks.len());

        for (chunk, count) in chunks.iter().zip(counts) {
            if count.is_mixed() {
                for sub in chunker::split(&chunk.content, self.config.max_mini_chunk_length()) {
                    tasks.push(TextChunk::new(sub.content, tasks.len()));
                }
            } else {
                tasks.push(TextChunk::new(chunk.content.clone(), tasks.len()));
            }
        }

        tasks
    }

    /// Translate a single chunk without chunking or classification
    pub async fn translate_chunk(&self, chunk: &TextChunk, to_language: &str) -> Result<String> {
        let backend = self.backend()?;
        TranslationExecutor::new(backend, self.model())
            .translate_chunk(chunk, to_language)
            .await
    }

    pub async fn count_languages(&self, chunk: &TextChunk) -> Result<LanguageCount> {
        let backend = self.backend()?;
        LanguageClassifier::new(backend, self.model(), self.config.max_chunk_length())
            .count_languages(chunk)
            .await
    }

    /// Detect the dominant language of `text` from its first words
    pub async fn detect_language(&self, text: &str) -> Result<DetectedLanguage> {
        let backend = self.backend()?;
        let detected = LanguageClassifier::new(backend, self.model(), self.config.max_chunk_length())
            .detect_language(text)
            .await?;

        info!(language = %detected, "detection complete");
        Ok(detected)
    }

    /// Blocking form of [`Translator::translate`]. Must not be called from
    /// inside an async runtime.
    pub fn translate_blocking(&self, text: &str, to_language: &str) -> Result<String> {
        block_on(self.translate(text, to_language))?
    }

    /// Blocking form of [`Translator::detect_language`]. Must not be called
    /// from inside an async runtime.
    pub fn detect_language_blocking(&self, text: &str) -> Result<DetectedLanguage> {
        block_on(self.detect_language(text))?
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("config", &self.config)
            .field("configured", &self.backend.is_some())
            .finish()
    }
}

/// Run `future` to completion on a dedicated current-thread runtime
fn block_on<F: Future>(future: F) -> Result<F::Output> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(TranslatorError::NestedRuntime);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    Ok(runtime.block_on(future))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::classifier::COUNT_SCHEMA;
    use crate::translation::executor::TRANSLATE_SCHEMA;
    use crate::translation::mock::ScriptedBackend;

    fn translator(backend: Arc<ScriptedBackend>, max: usize, mini: usize) -> Translator {
        let config = ModelConfig::new(ModelForTranslator::BestBig, max, mini).unwrap();
        Translator::new(config).with_backend(backend)
    }

    fn numbered_words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[tokio::test]
    async fn test_short_text_is_one_translation_call() {
        let backend = Arc::new(ScriptedBackend::new().translate_with(|t| t.to_uppercase()));
        let translator = translator(backend.clone(), 1000, 128);

        let output = translator.translate("bonjour le monde", "en").await.unwrap();

        assert_eq!(output, "BONJOUR LE MONDE");
        assert_eq!(backend.calls_for(COUNT_SCHEMA).len(), 1);
        assert_eq!(backend.calls_for(TRANSLATE_SCHEMA).len(), 1);
    }

    #[tokio::test]
    async fn test_echo_backend_leaves_target_language_text_unchanged() {
        let backend = Arc::new(ScriptedBackend::new());
        let translator = translator(backend, 30, 10);
        let text = "This sentence is already written in English and stays that way.";

        let output = translator.translate(text, "en").await.unwrap();
        assert_eq!(output, text);
    }

    #[tokio::test]
    async fn test_order_is_preserved_under_random_latency() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .count_with(|text| if text.contains("w3") { 2 } else { 1 })
                .jitter(15),
        );
        let translator = translator(backend.clone(), 40, 8);
        let text = numbered_words(120);

        let output = translator.translate(&text, "fr").await.unwrap();

        let tags: Vec<usize> = output
            .split_whitespace()
            .map(|w| w.trim_start_matches('w').parse().unwrap())
            .collect();
        assert!(tags.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(tags.len(), 120);
        assert_eq!(output, text);
    }

    #[tokio::test]
    async fn test_mixed_chunks_are_split_further() {
        let text = numbered_words(60);

        let single = Arc::new(ScriptedBackend::new());
        translator(single.clone(), 100, 20).translate(&text, "de").await.unwrap();

        let mixed = Arc::new(ScriptedBackend::new().count_with(|_| 2));
        let output = translator(mixed.clone(), 100, 20).translate(&text, "de").await.unwrap();

        let single_calls = single.calls_for(TRANSLATE_SCHEMA).len();
        let mixed_calls = mixed.calls_for(TRANSLATE_SCHEMA).len();
        assert!(mixed_calls > single_calls, "{} <= {}", mixed_calls, single_calls);
        for call in mixed.calls_for(TRANSLATE_SCHEMA) {
            assert!(call.user_content.chars().count() <= 20);
        }
        assert_eq!(output, text);
    }

    #[test]
    fn test_plan_keeps_sub_chunks_in_place() {
        let translator = Translator::new(ModelConfig::new(ModelForTranslator::BestBig, 100, 5).unwrap());
        let chunks = vec![
            TextChunk::new("first", 0),
            TextChunk::new("aa bb cc", 1),
            TextChunk::new("last", 2),
        ];
        let counts = vec![
            LanguageCount { chunk_index: 0, count: 1 },
            LanguageCount { chunk_index: 1, count: 3 },
            LanguageCount { chunk_index: 2, count: 1 },
        ];

        let tasks = translator.plan(&chunks, &counts);
        let contents: Vec<_> = tasks.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "aa bb", "cc", "last"]);
        assert!(tasks.iter().enumerate().all(|(i, t)| t.sequence_index == i));
    }

    #[tokio::test]
    async fn test_empty_text_makes_no_calls() {
        let backend = Arc::new(ScriptedBackend::new());
        let output = translator(backend.clone(), 1000, 128).translate("   ", "en").await.unwrap();
        assert_eq!(output, "");
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failure_fails_whole_translation() {
        let backend = Arc::new(ScriptedBackend::new().failing());
        let err = translator(backend, 10, 5)
            .translate("one two three four five six", "en")
            .await
            .unwrap_err();
        assert!(matches!(err, TranslatorError::Transport(_)));
    }

    #[tokio::test]
    async fn test_request_model_override_reaches_backend() {
        let backend = Arc::new(ScriptedBackend::new());
        let translator = translator(backend.clone(), 1000, 128);
        let request = translator
            .request("hallo", "en")
            .with_model(ModelForTranslator::Gpt4oMini);

        translator.translate_request(&request).await.unwrap();
        assert!(backend.calls().iter().all(|c| c.model == "gpt-4o-mini"));
    }

    #[tokio::test]
    async fn test_missing_client() {
        let translator = Translator::new(ModelConfig::default());

        let err = translator
            .translate_chunk(&TextChunk::new("hi", 0), "fr")
            .await
            .unwrap_err();
        assert!(matches!(err, TranslatorError::MissingCredential));
        assert!(matches!(
            translator.translate("hi", "fr").await,
            Err(TranslatorError::MissingCredential)
        ));
        assert!(matches!(
            translator.detect_language("hi").await,
            Err(TranslatorError::MissingCredential)
        ));
    }

    #[tokio::test]
    async fn test_detect_language_makes_one_call() {
        let backend = Arc::new(ScriptedBackend::new().detect_with(r#"{"iso_code": "pl"}"#));
        let translator = translator(backend.clone(), 5, 2);

        let detected = translator
            .detect_language(&numbered_words(50))
            .await
            .unwrap();

        assert_eq!(detected.display_name, "Polish");
        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].user_content, "w0 w1 w2 w3 w4");
    }

    #[test]
    fn test_blocking_translate() {
        let backend = Arc::new(ScriptedBackend::new().translate_with(|t| format!("<{}>", t)));
        let translator = translator(backend, 1000, 128);

        assert_eq!(translator.translate_blocking("ciao", "en").unwrap(), "<ciao>");
        assert_eq!(translator.detect_language_blocking("ciao").unwrap().iso_code, "en");
    }

    #[tokio::test]
    async fn test_blocking_inside_runtime_is_rejected() {
        let translator = translator(Arc::new(ScriptedBackend::new()), 1000, 128);
        assert!(matches!(
            translator.translate_blocking("ciao", "en"),
            Err(TranslatorError::NestedRuntime)
        ));
    }
}
