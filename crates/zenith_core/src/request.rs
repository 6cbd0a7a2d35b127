//! Request and response types for chat completion.

use crate::ChatMessage;
use serde::{Deserialize, Serialize};

/// One chat completion call.
///
/// # Examples
///
/// ```
/// use zenith_core::{ChatMessage, CompletionRequest};
///
/// let request = CompletionRequest::builder()
///     .messages(vec![ChatMessage::user("Hello!")])
///     .temperature(0.8f32)
///     .max_tokens(500u32)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages().len(), 1);
/// assert_eq!(*request.max_tokens(), 500);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct CompletionRequest {
    /// The conversation messages to send
    messages: Vec<ChatMessage>,
    /// Sampling temperature
    temperature: f32,
    /// Maximum number of tokens to generate
    max_tokens: u32,
}

impl CompletionRequest {
    /// Creates a new builder.
    pub fn builder() -> CompletionRequestBuilder {
        CompletionRequestBuilder::default()
    }
}

/// Text returned by a completion call.
///
/// # Examples
///
/// ```
/// use zenith_core::CompletionResponse;
///
/// let response = CompletionResponse::new("{\"Name\": \"Ilsa\"}");
/// assert!(response.text.starts_with('{'));
/// assert!(response.model.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text of the first choice
    pub text: String,
    /// Model that produced the reply, when reported
    pub model: Option<String>,
}

impl CompletionResponse {
    /// Creates a response with text only.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
        }
    }
}
