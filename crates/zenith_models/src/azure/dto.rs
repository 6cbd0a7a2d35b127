use serde::{Deserialize, Serialize};
use zenith_core::{ChatMessage, CompletionRequest};

/// Azure OpenAI chat completion request body.
///
/// The deployment is part of the URL, so unlike the public OpenAI API there is
/// no `model` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Temperature for sampling (0.0 - 2.0)
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl From<&CompletionRequest> for ChatCompletionRequest {
    fn from(req: &CompletionRequest) -> Self {
        Self {
            messages: req.messages().clone(),
            temperature: *req.temperature(),
            max_tokens: *req.max_tokens(),
        }
    }
}

/// Chat completion response body.
///
/// Only `choices` is required; Azure omits or nulls several fields when a
/// content filter intervenes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionResponse {
    /// Unique identifier for the completion
    #[serde(default)]
    pub id: String,
    /// Model used for completion
    #[serde(default)]
    pub model: Option<String>,
    /// Generated completions
    pub choices: Vec<Choice>,
    /// Token usage statistics
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if there is any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// A completion choice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Choice {
    /// Index of this choice
    #[serde(default)]
    pub index: u32,
    /// The generated message
    pub message: ChoiceMessage,
    /// Reason why generation finished
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message in a choice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChoiceMessage {
    /// Role of the message (typically "assistant")
    #[serde(default)]
    pub role: String,
    /// Generated content, null when filtered
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Usage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}
