//! Error types for the Zenith NPC generator.
//!
//! This crate provides the error taxonomy shared by every Zenith crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! The request-level taxonomy maps onto these types as follows:
//!
//! | Condition | Type |
//! |---|---|
//! | Bad generation preferences | [`ValidationError`] |
//! | Model API unreachable, unauthorized, rate limited | [`GenerationError`] (unavailable kinds) |
//! | Model output did not parse or validate | [`GenerationErrorKind::Malformed`] |
//! | No record survived the retry budget | [`GenerationErrorKind::Exhausted`] |
//! | Filesystem failure | [`StorageError`] |
//!
//! # Examples
//!
//! ```
//! use zenith_error::{ValidationError, ZenithResult};
//!
//! fn check_count(count: u32) -> ZenithResult<u32> {
//!     if count == 0 {
//!         Err(ValidationError::new("count must be at least 1"))?
//!     }
//!     Ok(count)
//! }
//!
//! assert!(check_count(0).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod server;
mod storage;
mod validation;

pub use config::ConfigError;
pub use error::{ZenithError, ZenithErrorKind, ZenithResult};
pub use generation::{GenerationError, GenerationErrorKind, GenerationResult, RetryableError};
pub use server::{ServerError, ServerErrorKind};
pub use storage::{StorageError, StorageErrorKind, StorageResult};
pub use validation::ValidationError;
