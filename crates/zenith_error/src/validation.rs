//! Request validation error types.

/// Generation preferences were malformed or out of range.
///
/// Raised before any external call is made and surfaced to the caller as-is.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", message, line, file)]
pub struct ValidationError {
    /// What was wrong with the request
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use zenith_error::ValidationError;
    ///
    /// let err = ValidationError::new("count must be between 1 and 20, got 0");
    /// assert!(err.message.contains("between 1 and 20"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
