//! Long-running server command.

use std::sync::Arc;
use tokio::net::TcpListener;
use zenith::{
    ApiState, GenerationService, ServerError, ServerErrorKind, TopicBus, TopicWorker,
    ZenithConfig, azure_service, create_router, serve,
};

/// Start the topic worker and serve HTTP until Ctrl-C.
pub async fn run_server(config: &ZenithConfig, bind: Option<String>) -> anyhow::Result<()> {
    let bind = bind.unwrap_or_else(|| config.server.bind.clone());

    let service: Arc<dyn GenerationService> = Arc::new(azure_service(config)?);
    let bus = TopicBus::new(config.topics.capacity);

    let worker = TopicWorker::new(service.clone(), bus.clone(), &config.topics).spawn();

    let listener = TcpListener::bind(&bind)
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Bind(format!("{}: {}", bind, e))))?;

    tracing::info!(
        service = %config.server.service_name,
        %bind,
        request_topic = %config.topics.request_topic,
        response_topic = %config.topics.response_topic,
        "Starting Zenith NPC generator"
    );

    let router = create_router(ApiState::new(service, bus, &config.topics));
    let result = serve(listener, router).await;

    worker.abort();
    tracing::info!("Server stopped");
    Ok(result?)
}
