//! Core data types for the Zenith NPC generator.
//!
//! This crate provides the record schema shared by the model client, the storage
//! service and the transports: the generated [`CharacterRecord`], the caller's
//! [`GenerationPreferences`], and the chat types sent to a language model.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod message;
mod preferences;
mod record;
mod request;
mod role;

pub use collection::CharacterCollection;
pub use message::ChatMessage;
pub use preferences::{
    DEFAULT_MAX_COUNT, GenerationPreferences, GenerationPreferencesBuilder, GenerationRequest,
    PreferenceIssue,
};
pub use record::{CharacterRecord, CharacterRecordBuilder, RecordIssue};
pub use request::{CompletionRequest, CompletionRequestBuilder, CompletionResponse};
pub use role::Role;
