//! Transports for the Zenith NPC generator.
//!
//! Two thin adapters sit over one shared [`zenith_interface::GenerationService`]:
//!
//! - [`create_router`] exposes the service over HTTP with axum
//! - [`TopicWorker`] consumes generation requests from an in-process
//!   [`TopicBus`] and publishes correlated responses
//!
//! Neither adapter holds state beyond the `Arc`-shared service.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dto;
mod http;
mod observability;
mod topics;
mod worker;

pub use dto::{
    AcceptedResponse, BatchResponse, ErrorResponse, ListResponse, OutcomeResponse,
    SingleResponse, StatsResponse,
};
pub use http::{ApiState, create_router, error_status, serve};
pub use observability::{ObservabilityConfig, init_observability};
pub use topics::{GenerateTopicMessage, TopicBus, TopicResponse};
pub use worker::TopicWorker;
