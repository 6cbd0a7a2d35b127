//! Outcome and status types returned across the seams.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use zenith_core::CharacterRecord;
use zenith_error::StorageError;

/// Whether generated records reached disk.
///
/// A failed write never discards the records it was given.
#[derive(Debug, Clone)]
pub enum Persistence {
    /// Written to `path`
    Saved {
        /// Individual or collection file
        path: PathBuf,
    },
    /// The write failed
    Failed {
        /// What went wrong
        error: StorageError,
    },
}

impl Persistence {
    /// Path written, if the write succeeded.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Persistence::Saved { path } => Some(path),
            Persistence::Failed { .. } => None,
        }
    }

    /// Failure description, if the write failed.
    pub fn error(&self) -> Option<String> {
        match self {
            Persistence::Saved { .. } => None,
            Persistence::Failed { error } => Some(error.kind.to_string()),
        }
    }

    /// True if the write succeeded.
    pub fn is_saved(&self) -> bool {
        matches!(self, Persistence::Saved { .. })
    }
}

/// A record slot in a batch that never produced a valid record.
///
/// # Examples
///
/// ```
/// use zenith_interface::RecordFailure;
///
/// let failure = RecordFailure { index: 1, attempts: 3, reason: "missing field `age`".into() };
/// let json = serde_json::to_value(&failure).unwrap();
/// assert_eq!(json["attempts"], 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFailure {
    /// Zero-based position in the batch
    pub index: u32,
    /// Attempts spent
    pub attempts: u32,
    /// Last reason the reply was rejected
    pub reason: String,
}

/// Result of a single-record request.
#[derive(Debug, Clone)]
pub struct SingleOutcome {
    /// The generated record
    pub record: CharacterRecord,
    /// Where it was written
    pub persistence: Persistence,
}

/// Result of a batch request.
///
/// `succeeded_count + failed_count == requested_count` and
/// `succeeded_count == records.len()` always hold.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Valid records in request order
    pub records: Vec<CharacterRecord>,
    /// `count` from the preferences
    pub requested_count: u32,
    /// Records produced
    pub succeeded_count: u32,
    /// Slots that exhausted their attempts
    pub failed_count: u32,
    /// Detail for each failed slot
    pub failures: Vec<RecordFailure>,
    /// Status of the batch file; an individual file when `requested_count` is 1
    pub persistence: Persistence,
    /// Individual files written, including mirrored collection members
    pub individual_files: Vec<PathBuf>,
}

/// Result of a dispatched [`zenith_core::GenerationRequest`].
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    /// `count == 1`
    Single(SingleOutcome),
    /// `count > 1`
    Batch(BatchOutcome),
}

/// Summary of the record directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    /// Individual record files
    pub count: usize,
    /// Collection files
    pub collection_count: usize,
    /// Bytes across all record files
    pub total_bytes: u64,
    /// Earliest modification time
    pub oldest: Option<DateTime<Utc>>,
    /// Latest modification time
    pub newest: Option<DateTime<Utc>>,
    /// Directory scanned
    pub directory: PathBuf,
}

/// Liveness payload.
///
/// # Examples
///
/// ```
/// use zenith_interface::HealthStatus;
///
/// let health = HealthStatus::healthy("zenith-npc-generator-service", "0.2.0");
/// assert_eq!(health.status, "healthy");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always "healthy" while the process is serving
    pub status: String,
    /// Service name
    pub service: String,
    /// Crate version
    pub version: String,
}

impl HealthStatus {
    /// A healthy report for `service` at `version`.
    pub fn healthy(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            service: service.into(),
            version: version.into(),
        }
    }
}
