//! Topic consumer that turns request messages into published responses.

use crate::{ErrorResponse, GenerateTopicMessage, OutcomeResponse, TopicBus, TopicResponse};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast::{Receiver, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, info_span, warn};
use zenith_config::TopicsConfig;
use zenith_error::{ValidationError, ZenithError};
use zenith_interface::GenerationService;

/// Consumes the request topic and answers on the response topic.
///
/// Each message runs in its own task, so responses may arrive out of order;
/// the `requestId` carries the correlation.
#[derive(Clone)]
pub struct TopicWorker {
    service: Arc<dyn GenerationService>,
    bus: TopicBus,
    request_topic: String,
    response_topic: String,
}

impl std::fmt::Debug for TopicWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicWorker")
            .field("request_topic", &self.request_topic)
            .field("response_topic", &self.response_topic)
            .finish_non_exhaustive()
    }
}

impl TopicWorker {
    /// Create a worker for the configured topics.
    pub fn new(service: Arc<dyn GenerationService>, bus: TopicBus, topics: &TopicsConfig) -> Self {
        Self {
            service,
            bus,
            request_topic: topics.request_topic.clone(),
            response_topic: topics.response_topic.clone(),
        }
    }

    /// Subscribe now and consume in a background task.
    ///
    /// Messages published after this returns are guaranteed to be seen.
    pub fn spawn(self) -> JoinHandle<()> {
        let rx = self.bus.subscribe(&self.request_topic);
        info!(topic = %self.request_topic, "Topic worker subscribed");
        tokio::spawn(self.run(rx))
    }

    async fn run(self, mut rx: Receiver<Value>) {
        loop {
            match rx.recv().await {
                Ok(message) => {
                    let worker = self.clone();
                    tokio::spawn(async move { worker.process(message).await });
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, topic = %self.request_topic, "Topic worker lagged, messages dropped");
                }
                Err(RecvError::Closed) => {
                    info!(topic = %self.request_topic, "Request topic closed, worker stopping");
                    break;
                }
            }
        }
    }

    async fn process(&self, message: Value) {
        let raw_id = message
            .get("requestId")
            .or_else(|| message.get("request_id"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let request = match GenerateTopicMessage::from_value(message) {
            Ok(message) => message.into_request(),
            Err(e) => {
                warn!(error = %e, "Unreadable topic message");
                let err = ZenithError::from(ValidationError::new(format!(
                    "Unreadable topic message: {}",
                    e
                )));
                let response = TopicResponse {
                    request_id: raw_id.unwrap_or_default(),
                    response: OutcomeResponse::Error(ErrorResponse::from(&err)),
                };
                self.respond(&self.response_topic, &response);
                return;
            }
        };

        let span = info_span!("topic_request", request_id = %request.request_id);
        async move {
            let request_id = request.request_id.clone();
            let topic = request
                .response_topic
                .clone()
                .unwrap_or_else(|| self.response_topic.clone());

            debug!(count = request.preferences.count, "Processing topic request");
            let result = self.service.handle(request).await;
            if let Err(e) = &result {
                error!(error = %e, "Topic request failed");
            }

            let response = TopicResponse {
                request_id,
                response: OutcomeResponse::from(result),
            };
            self.respond(&topic, &response);
        }
        .instrument(span)
        .await
    }

    fn respond(&self, topic: &str, response: &TopicResponse) {
        match self.bus.publish(topic, response) {
            Ok(receivers) => info!(topic, receivers, request_id = %response.request_id, "Published response"),
            Err(e) => error!(topic, error = %e, "Failed to publish response"),
        }
    }
}
