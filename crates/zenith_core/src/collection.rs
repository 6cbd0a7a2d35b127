//! On-disk shape of a batch of records.

use crate::CharacterRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A labelled, timestamped group of records written as one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterCollection {
    /// Caller-visible label, usually the request identifier
    pub label: String,
    /// When the collection was written
    pub generated_at: DateTime<Utc>,
    /// Number of records
    pub count: usize,
    /// The records, in request order
    pub records: Vec<CharacterRecord>,
}

impl CharacterCollection {
    /// Stamps a collection with the current time.
    pub fn new(label: impl Into<String>, records: Vec<CharacterRecord>) -> Self {
        Self {
            label: label.into(),
            generated_at: Utc::now(),
            count: records.len(),
            records,
        }
    }
}
