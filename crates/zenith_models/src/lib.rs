//! Language-model client for the Zenith NPC generator.
//!
//! [`AzureOpenAIClient`] implements [`zenith_interface::CompletionDriver`] against
//! the Azure OpenAI chat completions API. [`CharacterGenerator`] sits on top of
//! any driver: it builds the prompt, samples a temperature, repairs and
//! validates the reply, and retries replies that do not yield a valid record.
//!
//! # Example
//!
//! ```no_run
//! use zenith_config::ZenithConfig;
//! use zenith_core::GenerationPreferences;
//! use zenith_models::{AzureOpenAIClient, CharacterGenerator};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ZenithConfig::load(None)?;
//! let driver = AzureOpenAIClient::new(&config.model)?;
//! let generator = CharacterGenerator::new(driver, &config.generation, &config.model);
//!
//! let prefs = GenerationPreferences::builder().species_preference("Elf").build()?;
//! let record = generator.generate_one(&prefs).await?;
//! println!("{}", record.name());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod azure;
mod extraction;
mod generator;
mod prompt;

pub use azure::{
    AzureOpenAIClient, ChatCompletionRequest, ChatCompletionResponse, Choice, ChoiceMessage,
    Usage,
};
pub use extraction::{extract_json, parse_record};
pub use generator::{CharacterGenerator, GeneratedBatch, TemperatureRange};
pub use prompt::{SYSTEM_PROMPT, build_messages, build_prompt};
