//! Request orchestration for the Zenith NPC generator.
//!
//! The [`Orchestrator`] is the one implementation of
//! [`zenith_interface::GenerationService`]. It validates preferences, drives the
//! model client, hands valid records to storage, and assembles the outcome.
//! Both transports share a single orchestrator behind an `Arc`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod orchestrator;

pub use orchestrator::{DEFAULT_BATCH_LABEL, Orchestrator};
