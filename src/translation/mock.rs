// Scripted chat backend for tests

use super::backend::ChatBackend;
use super::classifier::{COUNT_SCHEMA, DETECT_SCHEMA};
use super::executor::TRANSLATE_SCHEMA;
use async_trait::async_trait;
use completions::{ChatRequest, CompletionError};
use rand::Rng;
use serde_json::json;
use std::sync::Mutex;
use std::time::Duration;

type CountFn = Box<dyn Fn(&str) -> u32 + Send + Sync>;
type TranslateFn = Box<dyn Fn(&str) -> String + Send + Sync>;

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub schema: String,
    pub model: String,
    pub user_content: String,
}

/// Answers each request according to its response schema and records it
pub(crate) struct ScriptedBackend {
    count: CountFn,
    translate: TranslateFn,
    raw_translation: Option<String>,
    detect: String,
    max_jitter_ms: u64,
    fail: bool,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedBackend {
    /// One language per chunk, echo translation, English detection
    pub fn new() -> Self {
        Self {
            count: Box::new(|_| 1),
            translate: Box::new(|text| text.to_string()),
            raw_translation: None,
            detect: r#"{"iso_code": "en"}"#.to_string(),
            max_jitter_ms: 0,
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn count_with(mut self, f: impl Fn(&str) -> u32 + Send + Sync + 'static) -> Self {
        self.count = Box::new(f);
        self
    }

    pub fn translate_with(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.translate = Box::new(f);
        self
    }

    pub fn raw_translation(mut self, content: &str) -> Self {
        self.raw_translation = Some(content.to_string());
        self
    }

    pub fn detect_with(mut self, content: &str) -> Self {
        self.detect = content.to_string();
        self
    }

    /// Delay every response by a random 0..=max_ms milliseconds
    pub fn jitter(mut self, max_ms: u64) -> Self {
        self.max_jitter_ms = max_ms;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, schema: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.schema == schema)
            .collect()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError> {
        let schema = request.schema_name().unwrap_or_default().to_string();
        let user_content = request.user_content().unwrap_or_default().to_string();

        self.calls.lock().unwrap().push(RecordedCall {
            schema: schema.clone(),
            model: request.model.clone(),
            user_content: user_content.clone(),
        });

        if self.max_jitter_ms > 0 {
            let delay = {
                let mut rng = rand::thread_rng();
                rng.gen_range(0..=self.max_jitter_ms)
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.fail {
            return Err(CompletionError::Status {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }

        let content = match schema.as_str() {
            DETECT_SCHEMA => self.detect.clone(),
            COUNT_SCHEMA => json!({ "language_count": (self.count)(&user_content) }).to_string(),
            TRANSLATE_SCHEMA => match &self.raw_translation {
                Some(raw) => raw.clone(),
                None => json!({ "translated_text": (self.translate)(&user_content) }).to_string(),
            },
            _ => return Err(CompletionError::EmptyResponse),
        };

        Ok(content)
    }
}
