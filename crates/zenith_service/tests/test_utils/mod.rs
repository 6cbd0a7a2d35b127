//! Test doubles for orchestrator tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use zenith_config::ZenithConfig;
use zenith_core::{CharacterRecord, CompletionRequest, CompletionResponse};
use zenith_error::{
    GenerationError, GenerationErrorKind, GenerationResult, StorageError, StorageErrorKind,
    StorageResult,
};
use zenith_interface::{CompletionDriver, RecordStorage, StorageStats};

/// A single scripted reply.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    Error(GenerationErrorKind),
}

/// Driver that replays a script in call order.
#[derive(Debug, Clone)]
pub struct MockDriver {
    script: Arc<Vec<MockResponse>>,
    repeat_last: bool,
    call_count: Arc<Mutex<usize>>,
}

impl MockDriver {
    pub fn always(text: impl Into<String>) -> Self {
        Self::with_script(vec![MockResponse::Text(text.into())], true)
    }

    pub fn failing(kind: GenerationErrorKind) -> Self {
        Self::with_script(vec![MockResponse::Error(kind)], true)
    }

    pub fn sequence(responses: Vec<MockResponse>) -> Self {
        Self::with_script(responses, false)
    }

    fn with_script(script: Vec<MockResponse>, repeat_last: bool) -> Self {
        Self {
            script: Arc::new(script),
            repeat_last,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl CompletionDriver for MockDriver {
    async fn complete(&self, _req: &CompletionRequest) -> GenerationResult<CompletionResponse> {
        let current = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count - 1
        };
        let index = if self.repeat_last {
            current.min(self.script.len().saturating_sub(1))
        } else {
            current
        };

        match self.script.get(index) {
            Some(MockResponse::Text(text)) => Ok(CompletionResponse::new(text.clone())),
            Some(MockResponse::Error(kind)) => Err(GenerationError::new(kind.clone())),
            None => Err(GenerationError::new(GenerationErrorKind::Api {
                status_code: 500,
                message: "Mock script exhausted".to_string(),
            })),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Storage whose writes always fail, counting every call.
#[derive(Debug, Clone, Default)]
pub struct BrokenStorage {
    calls: Arc<Mutex<usize>>,
}

impl BrokenStorage {
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn fail(&self) -> StorageError {
        *self.calls.lock().unwrap() += 1;
        StorageError::new(StorageErrorKind::FileWrite("disk full".to_string()))
    }
}

#[async_trait]
impl RecordStorage for BrokenStorage {
    async fn save_individual(&self, _record: &CharacterRecord) -> StorageResult<PathBuf> {
        Err(self.fail())
    }

    async fn save_collection(
        &self,
        _records: &[CharacterRecord],
        _label: &str,
    ) -> StorageResult<PathBuf> {
        Err(self.fail())
    }

    async fn list_all(&self) -> StorageResult<Vec<CharacterRecord>> {
        Err(StorageError::new(StorageErrorKind::DirectoryScan(
            "unreadable".to_string(),
        )))
    }

    async fn stats(&self) -> StorageResult<StorageStats> {
        Err(StorageError::new(StorageErrorKind::DirectoryScan(
            "unreadable".to_string(),
        )))
    }
}

/// A valid PascalCase reply.
pub fn valid_reply(name: &str, species: &str) -> String {
    format!(
        r#"Here you go:
```json
{{
  "Name": "{name}",
  "Age": 120,
  "Species": "{species}",
  "PhysicalDescription": "Silver hair braided with copper wire.",
  "PersonalityDescription": "Quietly generous, loudly opinionated.",
  "ResidentDistrict": "Arcane Spires"
}}
```"#
    )
}

/// Bundled configuration with deterministic batch ordering.
pub fn test_config(max_attempts: u32) -> ZenithConfig {
    let mut config = ZenithConfig::bundled().unwrap();
    config.generation.max_attempts = max_attempts;
    config.generation.batch_concurrency = 1;
    config
}
