//! Azure OpenAI chat completions driver.

mod client;
mod dto;

pub use client::AzureOpenAIClient;
pub use dto::{ChatCompletionRequest, ChatCompletionResponse, Choice, ChoiceMessage, Usage};
