// Server module - HTTP processing endpoint
//
// Exposes any configured processor over HTTP so a remote terminal session
// (processor kind "remote") can use it:
//
//   POST /api/process   {"text": "..."} -> {"result": "..."}
//   GET  /api/health    {"status": "ok", "processor": "<name>"}
//
// Input goes through the same truncation and validation as a local session.
// Processing failures answer with the generic message only; the cause is
// logged here and never sent over the wire.
//
// Security: Binds to 127.0.0.1 by default (localhost only).

use crate::config::ServerConfig;
use crate::processor::{ErrorResponse, ProcessRequest, ProcessResponse, SharedProcessor};
use crate::session::validation::{truncate, validate};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::future::Future;
use tokio::net::TcpListener;

/// Shared state for request handlers
#[derive(Clone)]
pub struct ServerState {
    processor: SharedProcessor,
    max_length: usize,
}

impl ServerState {
    pub fn new(processor: SharedProcessor, max_length: usize) -> Self {
        Self {
            processor,
            max_length,
        }
    }
}

/// Response body for GET /api/health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub processor: String,
}

/// Build the router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/process", post(process_text))
        .route("/api/health", get(health))
        .with_state(state)
}

/// Bind and serve until `shutdown` resolves
pub async fn serve(
    config: &ServerConfig,
    state: ServerState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let bind_addr = config.bind_addr;

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    tracing::info!(
        processor = state.processor.name(),
        "Processing endpoint listening on {}",
        bind_addr
    );

    // Stops accepting connections on shutdown, in-flight requests finish
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;

    tracing::info!("Processing endpoint shut down gracefully");
    Ok(())
}

async fn process_text(
    State(state): State<ServerState>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let text = truncate(&request.text, state.max_length);
    validate(&text).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    match state.processor.process(&text).await {
        Ok(result) => Ok(Json(ProcessResponse { result })),
        Err(e) => {
            tracing::error!(processor = state.processor.name(), "Processing failed: {}", e);
            Err(ApiError::Internal(e.user_message().to_string()))
        }
    }
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        processor: state.processor.name().to_string(),
    })
}

/// API error responses
/// Converted to HTTP status codes via IntoResponse
#[derive(Debug)]
pub enum ApiError {
    Internal(String),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        tracing::debug!("API error: {} - {}", status, error);

        (status, Json(ErrorResponse { error })).into_response()
    }
}
