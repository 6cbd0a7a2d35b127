//! HTTP adapter over the generation service.

use crate::{
    AcceptedResponse, BatchResponse, ErrorResponse, GenerateTopicMessage, ListResponse,
    SingleResponse, StatsResponse, TopicBus,
};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use zenith_config::TopicsConfig;
use zenith_core::GenerationPreferences;
use zenith_error::{ServerError, ServerErrorKind, ValidationError, ZenithError, ZenithErrorKind};
use zenith_interface::{GenerationService, HealthStatus};

/// Shared state handed to every route.
#[derive(Clone)]
pub struct ApiState {
    service: Arc<dyn GenerationService>,
    bus: TopicBus,
    request_topic: String,
}

impl ApiState {
    /// Creates new API state.
    pub fn new(service: Arc<dyn GenerationService>, bus: TopicBus, topics: &TopicsConfig) -> Self {
        Self {
            service,
            bus,
            request_topic: topics.request_topic.clone(),
        }
    }
}

/// Creates the HTTP router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/generate-npc", post(generate_npc))
        .route("/generate-npcs", post(generate_npcs))
        .route("/npcs", get(list_npcs))
        .route("/storage-stats", get(storage_stats))
        .route("/npc-generation-request", post(accept_request))
        .with_state(state)
}

/// Serve `router` on an already bound listener until Ctrl-C.
///
/// # Errors
///
/// Returns [`ServerErrorKind::Serve`] if the server stops with an error.
pub async fn serve(listener: TcpListener, router: Router) -> Result<(), ServerError> {
    let addr = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    info!(%addr, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Could not listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("Shutdown signal received");
        })
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())))
}

/// HTTP status for a failed request.
///
/// Validation is the caller's fault (400). An unreachable model API is 503,
/// and a model that never produced a usable record is 502. Everything else is 500.
pub fn error_status(kind: &ZenithErrorKind) -> StatusCode {
    match kind {
        ZenithErrorKind::Validation(_) => StatusCode::BAD_REQUEST,
        ZenithErrorKind::Generation(e) if e.kind.is_unavailable() => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ZenithErrorKind::Generation(_) => StatusCode::BAD_GATEWAY,
        ZenithErrorKind::Storage(_) | ZenithErrorKind::Config(_) | ZenithErrorKind::Server(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

struct ApiError(ZenithError);

impl<T: Into<ZenithError>> From<T> for ApiError {
    fn from(err: T) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = error_status(self.0.kind());
        if status.is_server_error() {
            error!(%status, error = %self.0, "Request failed");
        } else {
            warn!(%status, error = %self.0, "Request rejected");
        }
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

#[track_caller]
fn invalid_body(e: serde_json::Error) -> ApiError {
    ValidationError::new(format!("Invalid request body: {}", e)).into()
}

/// Parse a JSON body, treating an empty body or `null` as absent.
fn json_body(body: &Bytes) -> Result<Option<Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    match serde_json::from_slice::<Value>(body).map_err(invalid_body)? {
        Value::Null => Ok(None),
        value => Ok(Some(value)),
    }
}

fn preferences(body: &Bytes) -> Result<GenerationPreferences, ApiError> {
    match json_body(body)? {
        Some(value) => serde_json::from_value(value).map_err(invalid_body),
        None => Ok(GenerationPreferences::default()),
    }
}

async fn health_check(State(state): State<ApiState>) -> Json<HealthStatus> {
    Json(state.service.health())
}

async fn generate_npc(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<Json<SingleResponse>, ApiError> {
    let prefs = preferences(&body)?;
    info!(species = ?prefs.species(), district = ?prefs.district(), "Single NPC requested");
    let outcome = state.service.handle_single(prefs).await?;
    Ok(Json(outcome.into()))
}

async fn generate_npcs(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<Json<BatchResponse>, ApiError> {
    let prefs = preferences(&body)?;
    info!(count = prefs.count, "NPC batch requested");
    let outcome = state.service.handle_batch(prefs).await?;
    Ok(Json(outcome.into()))
}

async fn list_npcs(State(state): State<ApiState>) -> Result<Json<ListResponse>, ApiError> {
    let records = state.service.list_records().await?;
    Ok(Json(records.into()))
}

async fn storage_stats(State(state): State<ApiState>) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state.service.storage_stats().await?;
    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}

async fn accept_request(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<(StatusCode, Json<AcceptedResponse>), ApiError> {
    let value = json_body(&body)?.unwrap_or_else(|| Value::Object(Default::default()));
    let request = GenerateTopicMessage::from_value(value)
        .map_err(invalid_body)?
        .into_request();
    let request_id = request.request_id.clone();

    state
        .bus
        .publish(&state.request_topic, &GenerateTopicMessage::from(request))?;
    info!(%request_id, topic = %state.request_topic, "Generation request queued");

    Ok((
        StatusCode::ACCEPTED,
        Json(AcceptedResponse {
            status: "accepted",
            request_id,
        }),
    ))
}
