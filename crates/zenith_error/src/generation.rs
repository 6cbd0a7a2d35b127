//! Model generation errors and retry classification.

/// Conditions that can end a call to the language-model API.
///
/// The kinds split into two explicit groups:
/// - *unavailable* kinds (`Unauthorized`, `RateLimited`, `Network`, `Timeout`, `Api`)
///   describe a systemic problem with the upstream API and are never retried;
/// - `Malformed` describes a reply that could not be turned into a valid record and
///   is the only retryable kind.
///
/// `Exhausted` is produced by the caller once no record survived the retry budget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Credentials were rejected (HTTP 401/403)
    #[display("Model API rejected credentials: {}", _0)]
    Unauthorized(String),
    /// Upstream rate limit hit (HTTP 429)
    #[display("Model API rate limit exceeded: {}", _0)]
    RateLimited(String),
    /// Connection could not be established or was dropped
    #[display("Model API unreachable: {}", _0)]
    Network(String),
    /// The call did not finish within the configured timeout
    #[display("Model API call timed out: {}", _0)]
    Timeout(String),
    /// Any other non-success HTTP status
    #[display("Model API returned HTTP {}: {}", status_code, message)]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason phrase
        message: String,
    },
    /// The model replied, but the reply is not a valid character record
    #[display("Model output malformed: {}", _0)]
    Malformed(String),
    /// No valid record was produced for the request
    #[display("No valid record after {} attempt(s) for each of {} requested record(s)", attempts, requested)]
    Exhausted {
        /// Number of records requested
        requested: u32,
        /// Attempts spent per record
        attempts: u32,
    },
}

impl GenerationErrorKind {
    /// Check if this error type should be retried with the same prompt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationErrorKind::Malformed(_))
    }

    /// Check if this error means the model API itself is unavailable.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            GenerationErrorKind::Unauthorized(_)
                | GenerationErrorKind::RateLimited(_)
                | GenerationErrorKind::Network(_)
                | GenerationErrorKind::Timeout(_)
                | GenerationErrorKind::Api { .. }
        )
    }

    /// Classify a non-success HTTP status returned by the model API.
    ///
    /// # Examples
    ///
    /// ```
    /// use zenith_error::GenerationErrorKind;
    ///
    /// let kind = GenerationErrorKind::from_status(429, "slow down");
    /// assert!(matches!(kind, GenerationErrorKind::RateLimited(_)));
    /// assert!(kind.is_unavailable());
    /// ```
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => GenerationErrorKind::Unauthorized(message),
            429 => GenerationErrorKind::RateLimited(message),
            408 | 504 => GenerationErrorKind::Timeout(message),
            _ => GenerationErrorKind::Api {
                status_code,
                message,
            },
        }
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use zenith_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::Unauthorized("invalid api-key".into()));
/// assert!(format!("{}", err).contains("credentials"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a [`GenerationErrorKind::Malformed`] error.
    #[track_caller]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Malformed(reason.into()))
    }
}

/// Result type for model calls.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use zenith_error::{GenerationError, GenerationErrorKind, RetryableError};
///
/// let malformed = GenerationError::malformed("missing field `Species`");
/// assert!(malformed.is_retryable());
///
/// let limited = GenerationError::new(GenerationErrorKind::RateLimited("429".into()));
/// assert!(!limited.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger another attempt.
    ///
    /// Output problems (bad JSON, missing fields) are worth another sample.
    /// Upstream outages, auth failures and rate limits are not.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for GenerationError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
