//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Failed to list the storage directory
    #[display("Failed to scan storage directory: {}", _0)]
    DirectoryScan(String),
    /// Record could not be encoded or decoded
    #[display("Serialization failed: {}", _0)]
    Serialization(String),
    /// Refused to persist an empty collection
    #[display("Refusing to write empty collection: {}", _0)]
    EmptyCollection(String),
    /// No free file name could be found for a record
    #[display("No free file name for: {}", _0)]
    NameExhausted(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use zenith_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::FileRead("citizens/a.json".to_string()));
/// assert!(format!("{}", err).contains("Failed to read file"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
