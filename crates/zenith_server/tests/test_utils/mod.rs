//! Shared fixtures for transport tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use zenith_config::ZenithConfig;
use zenith_core::{CompletionRequest, CompletionResponse};
use zenith_error::{GenerationError, GenerationErrorKind, GenerationResult};
use zenith_interface::{CompletionDriver, GenerationService};
use zenith_models::CharacterGenerator;
use zenith_server::{ApiState, TopicBus, create_router};
use zenith_service::Orchestrator;
use zenith_storage::FileSystemRecordStorage;

/// Driver that answers every call the same way.
#[derive(Debug, Clone)]
pub struct FixedDriver {
    reply: Result<String, GenerationErrorKind>,
    calls: Arc<AtomicUsize>,
}

impl FixedDriver {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(kind: GenerationErrorKind) -> Self {
        Self {
            reply: Err(kind),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionDriver for FixedDriver {
    async fn complete(&self, _req: &CompletionRequest) -> GenerationResult<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(CompletionResponse::new(text.clone())),
            Err(kind) => Err(GenerationError::new(kind.clone())),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fixed"
    }

    fn model_name(&self) -> &str {
        "fixed-model"
    }
}

pub const ELF_REPLY: &str = r#"{
  "Name": "Aerendyl Moonwhisper",
  "Age": 247,
  "Species": "Elf",
  "PhysicalDescription": "Tall and silver-eyed, robes stitched with star charts.",
  "PersonalityDescription": "Measured, curious, and fond of riddles.",
  "ResidentDistrict": "Arcane Spires"
}"#;

/// A running service: storage directory, service handle, and bus.
pub struct Harness {
    pub dir: TempDir,
    pub config: ZenithConfig,
    pub service: Arc<dyn GenerationService>,
    pub bus: TopicBus,
}

impl Harness {
    pub fn new(driver: FixedDriver) -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = ZenithConfig::bundled().unwrap();
        config.storage.directory = dir.path().to_path_buf();
        config.generation.max_attempts = 2;

        let generator = CharacterGenerator::new(driver, &config.generation, &config.model);
        let storage = FileSystemRecordStorage::new(&config.storage).unwrap();
        let service: Arc<dyn GenerationService> =
            Arc::new(Orchestrator::new(generator, storage, &config));
        let bus = TopicBus::new(config.topics.capacity);

        Self {
            dir,
            config,
            service,
            bus,
        }
    }

    /// Serve the router on an ephemeral port and return its base URL.
    pub async fn spawn_http(&self) -> String {
        let state = ApiState::new(self.service.clone(), self.bus.clone(), &self.config.topics);
        let router = create_router(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{}", addr)
    }
}
