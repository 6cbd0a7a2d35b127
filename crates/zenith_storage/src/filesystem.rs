//! Filesystem-based record storage implementation.

use crate::naming::{
    FileClass, TEMP_PREFIX, collection_file_name, individual_file_name, safe_component, timestamp,
};
use chrono::{DateTime, Local, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use zenith_config::StorageConfig;
use zenith_core::{CharacterCollection, CharacterRecord, RecordIssue};
use zenith_error::{StorageError, StorageErrorKind, StorageResult};
use zenith_interface::{RecordStorage, StorageStats};

/// Highest collision suffix tried before giving up on a name.
const MAX_SUFFIX: u32 = 1000;

/// Filesystem storage backend.
///
/// # Features
///
/// - **Timestamped names**: `{YYYYMMDD_HHMMSS}_{name}.json`
/// - **No overwrites**: a name already taken gets `_1`, `_2`, ... appended
/// - **Atomic writes**: content goes to a hidden temp file first and is then
///   hard-linked into place, so readers never see a partial file
#[derive(Debug, Clone)]
pub struct FileSystemRecordStorage {
    directory: PathBuf,
}

impl FileSystemRecordStorage {
    /// Create storage rooted at the configured directory.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    pub fn new(config: &StorageConfig) -> StorageResult<Self> {
        Self::with_directory(&config.directory)
    }

    /// Create storage rooted at `directory`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(directory), fields(directory = %directory.as_ref().display()))]
    pub fn with_directory(directory: impl AsRef<Path>) -> StorageResult<Self> {
        let directory = directory.as_ref().to_path_buf();

        std::fs::create_dir_all(&directory).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                directory.display(),
                e
            )))
        })?;

        tracing::info!("Opened record storage");
        Ok(Self { directory })
    }

    /// Directory owned by this storage.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Write `bytes` under the first free name produced by `name_for`.
    async fn write_unique(
        &self,
        bytes: &[u8],
        name_for: impl Fn(u32) -> String,
    ) -> StorageResult<PathBuf> {
        let temp_path = self.directory.join(format!("{}{}", TEMP_PREFIX, Uuid::new_v4()));
        let result = match tokio::fs::write(&temp_path, bytes).await {
            Ok(()) => self.link_unique(&temp_path, &name_for).await,
            Err(e) => Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))),
        };

        // Removed on every path, including a partial write
        discard_temp(&temp_path).await;
        result
    }

    async fn link_unique(
        &self,
        temp_path: &Path,
        name_for: &impl Fn(u32) -> String,
    ) -> StorageResult<PathBuf> {
        for suffix in 0..=MAX_SUFFIX {
            let path = self.directory.join(name_for(suffix));
            match tokio::fs::hard_link(temp_path, &path).await {
                Ok(()) => return Ok(path),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(path = %path.display(), "Name taken, trying next suffix");
                }
                Err(e) => {
                    return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                        "link {} to {}: {}",
                        temp_path.display(),
                        path.display(),
                        e
                    ))));
                }
            }
        }

        Err(StorageError::new(StorageErrorKind::NameExhausted(
            name_for(0),
        )))
    }

    /// Names of every entry of the given class, sorted.
    async fn entries(&self, class: FileClass) -> StorageResult<Vec<(String, PathBuf)>> {
        let mut dir = tokio::fs::read_dir(&self.directory).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryScan(format!(
                "{}: {}",
                self.directory.display(),
                e
            )))
        })?;

        let mut entries = Vec::new();
        loop {
            let entry = match dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    return Err(StorageError::new(StorageErrorKind::DirectoryScan(format!(
                        "{}: {}",
                        self.directory.display(),
                        e
                    ))));
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            if FileClass::of(&name) == class {
                entries.push((name, entry.path()));
            }
        }

        entries.sort();
        Ok(entries)
    }

    async fn read_record(path: &Path) -> Option<CharacterRecord> {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Record vanished during scan");
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable record file");
                return None;
            }
        };

        let record: CharacterRecord = match serde_json::from_str(&text) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unparsable record file");
                return None;
            }
        };

        match record.validate() {
            Ok(()) => Some(record),
            Err(issues) => {
                tracing::warn!(
                    path = %path.display(),
                    issues = %RecordIssue::join(&issues),
                    "Skipping invalid record file"
                );
                None
            }
        }
    }
}

async fn discard_temp(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove temp file");
        }
    }
}

fn serialize<T: serde::Serialize>(value: &T) -> StorageResult<Vec<u8>> {
    serde_json::to_vec_pretty(value)
        .map_err(|e| StorageError::new(StorageErrorKind::Serialization(e.to_string())))
}

#[async_trait::async_trait]
impl RecordStorage for FileSystemRecordStorage {
    #[tracing::instrument(skip(self, record), fields(name = %record.name()))]
    async fn save_individual(&self, record: &CharacterRecord) -> StorageResult<PathBuf> {
        let bytes = serialize(record)?;
        let stamp = timestamp(Local::now());
        let name = safe_component(record.name(), "unnamed");

        let path = self
            .write_unique(&bytes, |suffix| individual_file_name(&stamp, &name, suffix))
            .await?;

        tracing::info!(path = %path.display(), "Saved record");
        Ok(path)
    }

    #[tracing::instrument(skip(self, records), fields(count = records.len()))]
    async fn save_collection(
        &self,
        records: &[CharacterRecord],
        label: &str,
    ) -> StorageResult<PathBuf> {
        if records.is_empty() {
            return Err(StorageError::new(StorageErrorKind::EmptyCollection(
                label.to_string(),
            )));
        }

        let collection = CharacterCollection::new(label, records.to_vec());
        let bytes = serialize(&collection)?;
        let stamp = timestamp(collection.generated_at.with_timezone(&Local));
        let safe_label = safe_component(label, "batch");

        let path = self
            .write_unique(&bytes, |suffix| {
                collection_file_name(&stamp, &safe_label, suffix)
            })
            .await?;

        tracing::info!(path = %path.display(), "Saved collection");
        Ok(path)
    }

    #[tracing::instrument(skip(self), fields(directory = %self.directory.display()))]
    async fn list_all(&self) -> StorageResult<Vec<CharacterRecord>> {
        let mut records = Vec::new();
        for (_, path) in self.entries(FileClass::Record).await? {
            if let Some(record) = Self::read_record(&path).await {
                records.push(record);
            }
        }

        tracing::debug!(count = records.len(), "Listed records");
        Ok(records)
    }

    #[tracing::instrument(skip(self), fields(directory = %self.directory.display()))]
    async fn stats(&self) -> StorageResult<StorageStats> {
        let mut stats = StorageStats {
            count: 0,
            collection_count: 0,
            total_bytes: 0,
            oldest: None,
            newest: None,
            directory: self.directory.clone(),
        };

        let records = self.entries(FileClass::Record).await?;
        let collections = self.entries(FileClass::Collection).await?;

        for (class, (_, path)) in records
            .into_iter()
            .map(|entry| (FileClass::Record, entry))
            .chain(collections.into_iter().map(|entry| (FileClass::Collection, entry)))
        {
            let metadata = match tokio::fs::metadata(&path).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "Skipping entry without metadata");
                    continue;
                }
            };

            match class {
                FileClass::Collection => stats.collection_count += 1,
                _ => stats.count += 1,
            }
            stats.total_bytes += metadata.len();

            if let Ok(modified) = metadata.modified() {
                let modified = DateTime::<Utc>::from(modified);
                stats.oldest = Some(stats.oldest.map_or(modified, |t| t.min(modified)));
                stats.newest = Some(stats.newest.map_or(modified, |t| t.max(modified)));
            }
        }

        Ok(stats)
    }
}
