//! Top-level error wrapper types.

use crate::{ConfigError, GenerationError, ServerError, StorageError, ValidationError};

/// Every failure a Zenith operation can report.
///
/// # Examples
///
/// ```
/// use zenith_error::{ZenithError, ZenithErrorKind, StorageError, StorageErrorKind};
///
/// let storage = StorageError::new(StorageErrorKind::FileWrite("disk full".into()));
/// let err: ZenithError = storage.into();
/// assert!(matches!(err.kind(), ZenithErrorKind::Storage(_)));
/// assert!(format!("{}", err).contains("Storage Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ZenithErrorKind {
    /// Request rejected before any external call
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Model API failure or no valid output
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Filesystem failure
    #[from(StorageError)]
    Storage(StorageError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Transport adapter error
    #[from(ServerError)]
    Server(ServerError),
}

impl ZenithErrorKind {
    /// Short machine-readable label for this kind, used in response payloads.
    pub fn label(&self) -> &'static str {
        match self {
            ZenithErrorKind::Validation(_) => "validation",
            ZenithErrorKind::Generation(e) if e.kind.is_unavailable() => "generation_unavailable",
            ZenithErrorKind::Generation(e) if e.kind.is_retryable() => "generation_malformed",
            ZenithErrorKind::Generation(_) => "generation_exhausted",
            ZenithErrorKind::Storage(_) => "storage",
            ZenithErrorKind::Config(_) => "config",
            ZenithErrorKind::Server(_) => "server",
        }
    }
}

/// Zenith error with kind discrimination.
///
/// # Examples
///
/// ```
/// use zenith_error::{ZenithResult, ConfigError};
///
/// fn might_fail() -> ZenithResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Zenith Error: {}", _0)]
pub struct ZenithError(Box<ZenithErrorKind>);

impl ZenithError {
    /// Create a new error from a kind.
    pub fn new(kind: ZenithErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ZenithErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to ZenithErrorKind
impl<T> From<T> for ZenithError
where
    T: Into<ZenithErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Zenith operations.
pub type ZenithResult<T> = std::result::Result<T, ZenithError>;
