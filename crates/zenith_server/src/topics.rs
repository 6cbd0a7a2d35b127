//! In-process publish/subscribe topics and the messages carried on them.

use crate::OutcomeResponse;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use zenith_core::{GenerationPreferences, GenerationRequest};
use zenith_error::{ServerError, ServerErrorKind};

/// Topic registry backed by one tokio broadcast channel per topic name.
///
/// Payloads travel as JSON values. Clones share the same topics.
#[derive(Debug, Clone)]
pub struct TopicBus {
    topics: Arc<Mutex<HashMap<String, broadcast::Sender<Value>>>>,
    capacity: usize,
}

impl TopicBus {
    /// Create a bus whose topics buffer `capacity` messages per subscriber.
    pub fn new(capacity: usize) -> Self {
        Self {
            topics: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Per-subscriber buffer size.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn sender(&self, topic: &str) -> broadcast::Sender<Value> {
        self.topics
            .lock()
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }

    /// Subscribe to `topic`, creating it if needed.
    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<Value> {
        self.sender(topic).subscribe()
    }

    /// Publish `payload` to `topic` and return how many subscribers got it.
    ///
    /// A topic nobody listens to swallows the message.
    ///
    /// # Errors
    ///
    /// Returns [`ServerErrorKind::Publish`] if the payload does not serialize.
    pub fn publish<T: Serialize>(&self, topic: &str, payload: &T) -> Result<usize, ServerError> {
        let value = serde_json::to_value(payload).map_err(|e| {
            ServerError::new(ServerErrorKind::Publish(format!("{}: {}", topic, e)))
        })?;

        match self.sender(topic).send(value) {
            Ok(receivers) => Ok(receivers),
            Err(broadcast::error::SendError(_)) => {
                tracing::debug!(topic, "No subscribers, message dropped");
                Ok(0)
            }
        }
    }
}

/// A generation request as it arrives on the request topic.
///
/// Accepts the nested form `{requestId, responseTopic, request: {...}}` and
/// the flat form where the preference fields sit beside `requestId`.
///
/// # Examples
///
/// ```
/// use zenith_server::GenerateTopicMessage;
///
/// let flat = serde_json::json!({"request_id": "r-1", "count": 2, "species_preference": "Elf"});
/// let message = GenerateTopicMessage::from_value(flat).unwrap();
/// assert_eq!(message.request_id.as_deref(), Some("r-1"));
/// assert_eq!(message.request.count, 2);
/// assert_eq!(message.request.species(), Some("Elf"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTopicMessage {
    /// Correlation token; assigned if absent
    #[serde(default, alias = "request_id", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Where the response goes; the configured response topic if absent
    #[serde(default, alias = "response_topic", skip_serializing_if = "Option::is_none")]
    pub response_topic: Option<String>,
    /// Preferences for the request
    #[serde(default, alias = "preferences")]
    pub request: GenerationPreferences,
}

impl GenerateTopicMessage {
    /// Parse either message form.
    ///
    /// # Errors
    ///
    /// Returns the serde error if the value is not an object of the expected shape.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        if !value.is_object() {
            return Err(serde::de::Error::custom("topic message must be a JSON object"));
        }

        let nested = ["request", "preferences"]
            .iter()
            .any(|key| value.get(key).is_some_and(Value::is_object));
        if nested {
            return serde_json::from_value(value);
        }

        let flat = GenerationPreferences::deserialize(&value)?;
        let mut message: Self = serde_json::from_value(value)?;
        message.request = flat;
        Ok(message)
    }

    /// Convert into a request, assigning an identifier if none was given.
    pub fn into_request(self) -> GenerationRequest {
        GenerationRequest::with_optional_id(self.request_id, self.request)
            .response_topic(self.response_topic)
    }
}

impl From<GenerationRequest> for GenerateTopicMessage {
    fn from(request: GenerationRequest) -> Self {
        Self {
            request_id: Some(request.request_id),
            response_topic: request.response_topic,
            request: request.preferences,
        }
    }
}

/// Response published for one request, correlated by `requestId`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicResponse {
    /// Identifier of the originating request
    pub request_id: String,
    /// Outcome or failure
    pub response: OutcomeResponse,
}
