//! Layered configuration for the Zenith NPC generator.
//!
//! Configuration is loaded once at startup and passed by reference into the
//! constructors of the model client, the storage service and the transports.
//! Nothing reads the environment after [`ZenithConfig::load`] returns.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod loader;
mod sections;

pub use loader::ZenithConfig;
pub use sections::{
    GenerationConfig, LoggingConfig, ModelConfig, ServerConfig, StorageConfig, TopicsConfig,
};
