//! Top-level configuration and its source layering.

use crate::{
    GenerationConfig, LoggingConfig, ModelConfig, ServerConfig, StorageConfig, TopicsConfig,
};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};
use zenith_error::{ConfigError, ZenithError, ZenithResult};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../zenith.toml");

/// Variables the Azure tooling conventionally sets, mapped onto config keys.
const AZURE_VARIABLES: [(&str, &str); 4] = [
    ("model.endpoint", "AZURE_OPENAI_ENDPOINT"),
    ("model.api_key", "AZURE_OPENAI_API_KEY"),
    ("model.deployment", "AZURE_OPENAI_DEPLOYMENT_NAME"),
    ("model.api_version", "AZURE_OPENAI_API_VERSION"),
];

/// Top-level Zenith configuration.
///
/// Sources in order of precedence (later sources override earlier):
/// 1. Bundled defaults (zenith.toml shipped with the crate)
/// 2. User config in home directory (~/.config/zenith/zenith.toml)
/// 3. User config in current directory (./zenith.toml)
/// 4. An explicit file, e.g. from `--config`
/// 5. `ZENITH__SECTION__KEY` environment variables
/// 6. `AZURE_OPENAI_*` environment variables
///
/// # Example
///
/// ```
/// use zenith_config::ZenithConfig;
///
/// let config = ZenithConfig::bundled().unwrap();
/// assert_eq!(config.generation.max_count, 20);
/// assert_eq!(config.generation.max_attempts, 3);
/// assert!(!config.storage.mirror_collections);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ZenithConfig {
    /// Model API settings
    pub model: ModelConfig,
    /// Retry and batch settings
    pub generation: GenerationConfig,
    /// Record directory settings
    pub storage: StorageConfig,
    /// HTTP adapter settings
    pub server: ServerConfig,
    /// Topic adapter settings
    pub topics: TopicsConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

impl ZenithConfig {
    /// Bundled defaults only.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file fails to parse or validate.
    pub fn bundled() -> ZenithResult<Self> {
        Self::finish(Self::defaults())
    }

    /// Bundled defaults overlaid with a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> ZenithResult<Self> {
        debug!("Loading configuration from file");
        Self::finish(Self::defaults().add_source(File::from(path.as_ref())))
    }

    /// Load configuration from every source.
    ///
    /// User config files are optional and silently skipped if not found. An
    /// explicit file must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any source fails to parse or the result is invalid.
    #[instrument(skip(explicit))]
    pub fn load(explicit: Option<&Path>) -> ZenithResult<Self> {
        debug!("Loading configuration with precedence: env > explicit > current dir > home dir > bundled");

        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/zenith/zenith.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("zenith").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("ZENITH")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        for (key, variable) in AZURE_VARIABLES {
            let value = std::env::var(variable)
                .ok()
                .filter(|value| !value.trim().is_empty());
            builder = builder
                .set_override_option(key, value)
                .map_err(|e| ZenithError::from(ConfigError::new(format!("{key}: {e}"))))?;
        }

        Self::finish(builder)
    }

    /// Checks ranges that the type system cannot.
    ///
    /// Model credentials are not checked here; the Azure client checks them
    /// when it is built so that storage-only commands work without them.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let model = &self.model;
        if !(0.0..=2.0).contains(&model.temperature_min)
            || !(0.0..=2.0).contains(&model.temperature_max)
        {
            return Err(ConfigError::new(format!(
                "model temperatures must be within 0.0-2.0, got {}-{}",
                model.temperature_min, model.temperature_max
            )));
        }
        if model.temperature_min > model.temperature_max {
            return Err(ConfigError::new(format!(
                "model.temperature_min ({}) exceeds model.temperature_max ({})",
                model.temperature_min, model.temperature_max
            )));
        }
        if model.max_tokens == 0 || model.timeout_secs == 0 {
            return Err(ConfigError::new(
                "model.max_tokens and model.timeout_secs must be positive",
            ));
        }

        let generation = &self.generation;
        if generation.max_count == 0 {
            return Err(ConfigError::new("generation.max_count must be at least 1"));
        }
        if generation.max_attempts == 0 {
            return Err(ConfigError::new(
                "generation.max_attempts must be at least 1",
            ));
        }
        if generation.batch_concurrency == 0 {
            return Err(ConfigError::new(
                "generation.batch_concurrency must be at least 1",
            ));
        }

        if self.storage.directory.as_os_str().is_empty() {
            return Err(ConfigError::new("storage.directory must not be empty"));
        }
        if self.topics.capacity == 0 {
            return Err(ConfigError::new("topics.capacity must be at least 1"));
        }
        if self.topics.request_topic.trim().is_empty() || self.topics.response_topic.trim().is_empty()
        {
            return Err(ConfigError::new("topic names must not be empty"));
        }
        Ok(())
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> ZenithResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                ZenithError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                ZenithError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        Ok(config)
    }
}
