use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};
use zenith_config::ZenithConfig;
use zenith_core::{CharacterRecord, GenerationPreferences, GenerationRequest};
use zenith_error::{GenerationError, GenerationErrorKind, ValidationError, ZenithResult};
use zenith_interface::{
    BatchOutcome, CompletionDriver, GenerationOutcome, GenerationService, HealthStatus,
    Persistence, RecordStorage, SingleOutcome, StorageStats,
};
use zenith_models::CharacterGenerator;

/// Collection label used when a batch carries no request identifier.
pub const DEFAULT_BATCH_LABEL: &str = "batch";

/// Runs generation requests from validation to persisted outcome.
///
/// Order of work: validate preferences, generate, persist, report. Nothing is
/// persisted unless at least one valid record was produced, and a failed write
/// never discards the records it was given.
#[derive(Debug)]
pub struct Orchestrator<D, S> {
    generator: CharacterGenerator<D>,
    storage: S,
    max_count: u32,
    mirror_collections: bool,
    service_name: String,
}

impl<D, S> Orchestrator<D, S>
where
    D: CompletionDriver,
    S: RecordStorage,
{
    /// Wire a generator and a store together under `config`.
    pub fn new(generator: CharacterGenerator<D>, storage: S, config: &ZenithConfig) -> Self {
        Self {
            generator,
            storage,
            max_count: config.generation.max_count,
            mirror_collections: config.storage.mirror_collections,
            service_name: config.server.service_name.clone(),
        }
    }

    /// The record generator.
    pub fn generator(&self) -> &CharacterGenerator<D> {
        &self.generator
    }

    /// The record store.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn validate(&self, prefs: &GenerationPreferences) -> Result<(), ValidationError> {
        prefs.validate(self.max_count).map_err(|issue| {
            warn!(%issue, "Rejected generation preferences");
            ValidationError::new(issue.to_string())
        })
    }

    async fn single(&self, prefs: &GenerationPreferences) -> ZenithResult<SingleOutcome> {
        let record = self.generator.generate_one(prefs).await?;
        let persistence = self.persist_record(&record).await;

        info!(name = %record.name(), saved = persistence.is_saved(), "Single request finished");
        Ok(SingleOutcome {
            record,
            persistence,
        })
    }

    async fn batch(&self, prefs: &GenerationPreferences, label: &str) -> ZenithResult<BatchOutcome> {
        let generated = self.generator.generate_batch(prefs).await?;

        if generated.records.is_empty() {
            warn!(requested = prefs.count, "No valid records in batch");
            return Err(GenerationError::new(GenerationErrorKind::Exhausted {
                requested: prefs.count,
                attempts: self.generator.max_attempts(),
            })
            .into());
        }

        // A one-record batch is stored like a single request
        let (persistence, individual_files) = match generated.records.as_slice() {
            [record] if prefs.count == 1 => {
                let persistence = self.persist_record(record).await;
                let files: Vec<PathBuf> = persistence.path().map(Path::to_path_buf).into_iter().collect();
                (persistence, files)
            }
            records => {
                let persistence = self.persist_collection(records, label).await;
                let files = if self.mirror_collections {
                    self.mirror(records).await
                } else {
                    Vec::new()
                };
                (persistence, files)
            }
        };

        let outcome = BatchOutcome {
            requested_count: prefs.count,
            succeeded_count: generated.records.len() as u32,
            failed_count: generated.failures.len() as u32,
            records: generated.records,
            failures: generated.failures,
            persistence,
            individual_files,
        };

        info!(
            requested = outcome.requested_count,
            succeeded = outcome.succeeded_count,
            failed = outcome.failed_count,
            saved = outcome.persistence.is_saved(),
            "Batch request finished"
        );
        Ok(outcome)
    }

    async fn persist_record(&self, record: &CharacterRecord) -> Persistence {
        match self.storage.save_individual(record).await {
            Ok(path) => Persistence::Saved { path },
            Err(error) => {
                error!(%error, "Generated record could not be saved");
                Persistence::Failed { error }
            }
        }
    }

    async fn persist_collection(&self, records: &[CharacterRecord], label: &str) -> Persistence {
        match self.storage.save_collection(records, label).await {
            Ok(path) => Persistence::Saved { path },
            Err(error) => {
                error!(%error, "Generated collection could not be saved");
                Persistence::Failed { error }
            }
        }
    }

    async fn mirror(&self, records: &[CharacterRecord]) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(records.len());
        for record in records {
            match self.storage.save_individual(record).await {
                Ok(path) => paths.push(path),
                Err(error) => warn!(%error, name = %record.name(), "Mirror copy not saved"),
            }
        }
        paths
    }
}

#[async_trait]
impl<D, S> GenerationService for Orchestrator<D, S>
where
    D: CompletionDriver,
    S: RecordStorage,
{
    #[instrument(skip(self, prefs))]
    async fn handle_single(&self, prefs: GenerationPreferences) -> ZenithResult<SingleOutcome> {
        let prefs = prefs.with_count(1);
        self.validate(&prefs)?;
        self.single(&prefs).await
    }

    #[instrument(skip(self, prefs), fields(count = prefs.count))]
    async fn handle_batch(&self, prefs: GenerationPreferences) -> ZenithResult<BatchOutcome> {
        self.validate(&prefs)?;
        self.batch(&prefs, DEFAULT_BATCH_LABEL).await
    }

    #[instrument(skip(self, request), fields(request_id = %request.request_id, count = request.preferences.count))]
    async fn handle(&self, request: GenerationRequest) -> ZenithResult<GenerationOutcome> {
        let prefs = request.preferences;
        self.validate(&prefs)?;

        if prefs.count == 1 {
            Ok(GenerationOutcome::Single(self.single(&prefs).await?))
        } else {
            Ok(GenerationOutcome::Batch(
                self.batch(&prefs, &request.request_id).await?,
            ))
        }
    }

    fn health(&self) -> HealthStatus {
        HealthStatus::healthy(&self.service_name, env!("CARGO_PKG_VERSION"))
    }

    #[instrument(skip(self))]
    async fn list_records(&self) -> ZenithResult<Vec<CharacterRecord>> {
        Ok(self.storage.list_all().await?)
    }

    #[instrument(skip(self))]
    async fn storage_stats(&self) -> ZenithResult<StorageStats> {
        Ok(self.storage.stats().await?)
    }
}
