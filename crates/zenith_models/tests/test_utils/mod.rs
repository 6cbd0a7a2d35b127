//! Test utilities for Zenith model tests.
//!
//! This module provides a scripted mock driver and reply fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use zenith_config::ZenithConfig;
use zenith_core::{CompletionRequest, CompletionResponse};
use zenith_error::{GenerationError, GenerationErrorKind, GenerationResult};
use zenith_interface::CompletionDriver;

/// A single scripted reply (text or error).
#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    Error(GenerationErrorKind),
}

/// Mock driver that replays a script and counts calls.
///
/// Clones share the script position and call counter.
#[derive(Debug, Clone)]
pub struct MockDriver {
    script: Arc<Vec<MockResponse>>,
    repeat_last: bool,
    call_count: Arc<Mutex<usize>>,
    temperatures: Arc<Mutex<Vec<f32>>>,
}

impl MockDriver {
    /// Always reply with `text`.
    pub fn always(text: impl Into<String>) -> Self {
        Self::with_script(vec![MockResponse::Text(text.into())], true)
    }

    /// Always fail with `kind`.
    pub fn failing(kind: GenerationErrorKind) -> Self {
        Self::with_script(vec![MockResponse::Error(kind)], true)
    }

    /// Replay `responses` in order, then fail.
    pub fn sequence(responses: Vec<MockResponse>) -> Self {
        Self::with_script(responses, false)
    }

    fn with_script(script: Vec<MockResponse>, repeat_last: bool) -> Self {
        Self {
            script: Arc::new(script),
            repeat_last,
            call_count: Arc::new(Mutex::new(0)),
            temperatures: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of times complete() was called.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Temperatures seen, in call order.
    pub fn temperatures(&self) -> Vec<f32> {
        self.temperatures.lock().unwrap().clone()
    }

    fn next_response(&self) -> GenerationResult<CompletionResponse> {
        let mut count = self.call_count.lock().unwrap();
        let current = *count;
        *count += 1;

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
                message: format!(
                    "Mock script exhausted (call {} beyond {} responses)",
                    current + 1,
                    self.script.len()
                ),
            })),
        }
    }
}

#[async_trait]
impl CompletionDriver for MockDriver {
    async fn complete(&self, req: &CompletionRequest) -> GenerationResult<CompletionResponse> {
        tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
        self.temperatures.lock().unwrap().push(*req.temperature());
        self.next_response()
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// A valid reply in the shape the prompt asks for.
pub fn valid_reply(name: &str, species: &str) -> String {
    format!(
        r#"{{
  "Name": "{name}",
  "Age": 42,
  "Species": "{species}",
  "PhysicalDescription": "Weathered hands and a lopsided grin.",
  "PersonalityDescription": "Haggles over everything, tips generously anyway.",
  "ResidentDistrict": "Merchant Quarter"
}}"#
    )
}

/// Bundled configuration with test-friendly generation settings.
pub fn test_config(max_attempts: u32, batch_concurrency: usize) -> ZenithConfig {
    let mut config = ZenithConfig::bundled().unwrap();
    config.generation.max_attempts = max_attempts;
    config.generation.batch_concurrency = batch_concurrency;
    config
}
