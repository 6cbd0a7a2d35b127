//! Zenith - LLM-driven NPC generator
//!
//! Zenith asks an Azure OpenAI chat deployment for citizens of the fantasy
//! city of Zenith, validates each reply into a [`CharacterRecord`], and keeps
//! the results as JSON files on disk.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use zenith::{GenerationPreferences, GenerationService, ZenithConfig, azure_service};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ZenithConfig::load(None)?;
//!     let service = azure_service(&config)?;
//!
//!     let prefs = GenerationPreferences::builder()
//!         .species_preference("Elf")
//!         .build()?;
//!     let outcome = service.handle_single(prefs).await?;
//!     println!("{}", outcome.record.name());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `zenith_error` - Error types
//! - `zenith_core` - Record schema, preferences, chat messages
//! - `zenith_config` - Layered configuration
//! - `zenith_interface` - Driver, storage and service traits
//! - `zenith_models` - Azure OpenAI client and retrying generator
//! - `zenith_storage` - Filesystem record storage
//! - `zenith_service` - Request orchestration
//! - `zenith_server` - HTTP and topic transports
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use zenith_config::*;
pub use zenith_core::*;
pub use zenith_error::*;
pub use zenith_interface::*;
pub use zenith_models::*;
pub use zenith_server::*;
pub use zenith_service::*;
pub use zenith_storage::*;

/// Orchestrator wired to Azure OpenAI and the filesystem.
pub type ZenithService = Orchestrator<AzureOpenAIClient, FileSystemRecordStorage>;

/// Open the configured record directory.
///
/// # Errors
///
/// Returns error if the directory cannot be created.
pub fn open_storage(config: &ZenithConfig) -> ZenithResult<FileSystemRecordStorage> {
    Ok(FileSystemRecordStorage::new(&config.storage)?)
}

/// Build the production service from configuration.
///
/// # Errors
///
/// Returns error if model credentials are missing or the record directory
/// cannot be created.
pub fn azure_service(config: &ZenithConfig) -> ZenithResult<ZenithService> {
    let client = AzureOpenAIClient::new(&config.model)?;
    tracing::info!(
        deployment = %config.model.deployment,
        api_version = %config.model.api_version,
        "Azure OpenAI client ready"
    );
    let generator = CharacterGenerator::new(client, &config.generation, &config.model);
    let storage = open_storage(config)?;
    Ok(Orchestrator::new(generator, storage, config))
}
