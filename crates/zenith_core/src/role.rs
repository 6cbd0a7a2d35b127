//! Role types for chat participants.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
///
/// # Examples
///
/// ```
/// use zenith_core::Role;
///
/// assert_ne!(Role::System, Role::User);
/// assert_eq!(format!("{}", Role::Assistant), "assistant");
/// assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that frame the conversation
    #[display("system")]
    System,
    /// The prompt
    #[display("user")]
    User,
    /// The model's reply
    #[display("assistant")]
    Assistant,
}
