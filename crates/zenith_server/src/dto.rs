//! JSON bodies shared by the HTTP and topic transports.

use serde::Serialize;
use std::path::Path;
use zenith_core::CharacterRecord;
use zenith_error::{ZenithError, ZenithErrorKind};
use zenith_interface::{
    BatchOutcome, GenerationOutcome, RecordFailure, SingleOutcome, StorageStats,
};

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

/// Reply to a single-record request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleResponse {
    /// Always true
    pub success: bool,
    /// The generated record
    pub npc: CharacterRecord,
    /// File the record was written to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<String>,
    /// Why the record was not written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_error: Option<String>,
}

impl From<SingleOutcome> for SingleResponse {
    fn from(outcome: SingleOutcome) -> Self {
        Self {
            success: true,
            saved_to: outcome.persistence.path().map(display_path),
            storage_error: outcome.persistence.error(),
            npc: outcome.record,
        }
    }
}

/// Reply to a batch request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    /// Always true; partial batches still succeed
    pub success: bool,
    /// Valid records in request order
    pub npcs: Vec<CharacterRecord>,
    /// Records asked for
    pub requested_count: u32,
    /// Records produced
    pub generated_count: u32,
    /// Slots that produced nothing
    pub failed_count: u32,
    /// Per-slot failure detail
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RecordFailure>,
    /// Collection file written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_file: Option<String>,
    /// Mirrored individual files
    pub individual_files: Vec<String>,
    /// Why the collection was not written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_error: Option<String>,
}

impl From<BatchOutcome> for BatchResponse {
    fn from(outcome: BatchOutcome) -> Self {
        Self {
            success: true,
            collection_file: outcome
                .persistence
                .path()
                .filter(|_| outcome.requested_count > 1)
                .map(display_path),
            storage_error: outcome.persistence.error(),
            individual_files: outcome
                .individual_files
                .iter()
                .map(|p| display_path(p))
                .collect(),
            npcs: outcome.records,
            requested_count: outcome.requested_count,
            generated_count: outcome.succeeded_count,
            failed_count: outcome.failed_count,
            failures: outcome.failures,
        }
    }
}

/// Failure body: `{success: false, error, errorKind}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Human-readable cause
    pub error: String,
    /// Machine-readable category, see [`ZenithErrorKind::label`]
    pub error_kind: &'static str,
}

impl From<&ZenithError> for ErrorResponse {
    fn from(err: &ZenithError) -> Self {
        // Location details stay in the logs
        let error = match err.kind() {
            ZenithErrorKind::Validation(e) => e.message.clone(),
            ZenithErrorKind::Generation(e) => e.kind.to_string(),
            ZenithErrorKind::Storage(e) => e.kind.to_string(),
            ZenithErrorKind::Config(e) => e.message.clone(),
            ZenithErrorKind::Server(e) => e.kind.to_string(),
        };
        Self {
            success: false,
            error,
            error_kind: err.kind().label(),
        }
    }
}

/// Any reply the topic worker can publish.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OutcomeResponse {
    /// Single record
    Single(SingleResponse),
    /// Batch
    Batch(BatchResponse),
    /// Request failed
    Error(ErrorResponse),
}

impl From<GenerationOutcome> for OutcomeResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        match outcome {
            GenerationOutcome::Single(single) => OutcomeResponse::Single(single.into()),
            GenerationOutcome::Batch(batch) => OutcomeResponse::Batch(batch.into()),
        }
    }
}

impl From<Result<GenerationOutcome, ZenithError>> for OutcomeResponse {
    fn from(result: Result<GenerationOutcome, ZenithError>) -> Self {
        match result {
            Ok(outcome) => outcome.into(),
            Err(err) => OutcomeResponse::Error(ErrorResponse::from(&err)),
        }
    }
}

/// Stored records.
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    /// Always true
    pub success: bool,
    /// Number of records
    pub count: usize,
    /// The records
    pub npcs: Vec<CharacterRecord>,
}

impl From<Vec<CharacterRecord>> for ListResponse {
    fn from(npcs: Vec<CharacterRecord>) -> Self {
        Self {
            success: true,
            count: npcs.len(),
            npcs,
        }
    }
}

/// Storage statistics.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Always true
    pub success: bool,
    /// Directory summary
    pub stats: StorageStats,
}

/// Receipt for a request queued on the request topic.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedResponse {
    /// Always "accepted"
    pub status: &'static str,
    /// Identifier the response will carry
    pub request_id: String,
}
