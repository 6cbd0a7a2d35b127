//! Chat message type.

use crate::Role;
use serde::{Deserialize, Serialize};

/// A single text message in a chat completion request.
///
/// # Examples
///
/// ```
/// use zenith_core::{ChatMessage, Role};
///
/// let message = ChatMessage::user("Describe a citizen of Zenith.");
/// assert_eq!(message.role, Role::User);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}
