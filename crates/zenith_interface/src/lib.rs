//! Trait definitions for the Zenith NPC generator.
//!
//! Three seams separate the components: [`CompletionDriver`] hides the language
//! model API, [`RecordStorage`] hides the record directory, and
//! [`GenerationService`] is what both transports call.

mod traits;
mod types;

pub use traits::{CompletionDriver, GenerationService, RecordStorage};
pub use types::{
    BatchOutcome, GenerationOutcome, HealthStatus, Persistence, RecordFailure, SingleOutcome,
    StorageStats,
};
