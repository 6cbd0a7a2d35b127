//! Trait definitions for the model API, the record store and the service.

use crate::{BatchOutcome, GenerationOutcome, HealthStatus, SingleOutcome, StorageStats};
use async_trait::async_trait;
use std::path::PathBuf;
use zenith_core::{
    CharacterRecord, CompletionRequest, CompletionResponse, GenerationPreferences,
    GenerationRequest,
};
use zenith_error::{GenerationResult, StorageResult, ZenithResult};

/// Core trait that every language-model backend implements.
///
/// Errors are classified by [`zenith_error::GenerationErrorKind`] so callers
/// can tell an outage from a bad reply without inspecting messages.
#[async_trait]
pub trait CompletionDriver: Send + Sync {
    /// Run one chat completion and return the text of the first choice.
    async fn complete(&self, req: &CompletionRequest) -> GenerationResult<CompletionResponse>;

    /// Provider name (e.g., "azure-openai").
    fn provider_name(&self) -> &'static str;

    /// Model or deployment identifier.
    fn model_name(&self) -> &str;
}

/// Persistence for generated records.
///
/// Implementations own their storage location exclusively. Files, once
/// written, are never modified.
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Persist one record, returning where it was written.
    async fn save_individual(&self, record: &CharacterRecord) -> StorageResult<PathBuf>;

    /// Persist a labelled group of records as one unit.
    async fn save_collection(
        &self,
        records: &[CharacterRecord],
        label: &str,
    ) -> StorageResult<PathBuf>;

    /// Every individually stored record, in a stable order.
    async fn list_all(&self) -> StorageResult<Vec<CharacterRecord>>;

    /// Summary statistics, computed without parsing record contents.
    async fn stats(&self) -> StorageResult<StorageStats>;
}

/// The operations both transports expose.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate and persist exactly one record.
    async fn handle_single(&self, prefs: GenerationPreferences) -> ZenithResult<SingleOutcome>;

    /// Generate `prefs.count` records and persist them as a collection.
    async fn handle_batch(&self, prefs: GenerationPreferences) -> ZenithResult<BatchOutcome>;

    /// Dispatch a correlated request to the single or batch flow.
    async fn handle(&self, request: GenerationRequest) -> ZenithResult<GenerationOutcome>;

    /// Liveness report; makes no external calls.
    fn health(&self) -> HealthStatus;

    /// Every stored individual record.
    async fn list_records(&self) -> ZenithResult<Vec<CharacterRecord>>;

    /// Statistics for the record directory.
    async fn storage_stats(&self) -> ZenithResult<StorageStats>;
}
