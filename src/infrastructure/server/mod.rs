//! HTTP server: the LINE webhook endpoint and a health check.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;

use crate::infrastructure::line::types::WebhookEnvelope;
use crate::infrastructure::line::{verify_signature, LineClient};
use crate::services::RagPipeline;

/// Shared handler state. Cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RagPipeline>,
    pub line: LineClient,
    pub channel_secret: String,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {addr}");

    axum::serve(listener, router(state))
        .await
        .context("server error")?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "message": "Coffee Corner RAG Bot is running! ☕",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// The webhook handler. Signature verification runs over the raw body
/// before parsing; a bad signature is the only client error. Pipeline and
/// reply failures never become non-2xx responses, since LINE retries
/// failed deliveries and a retry would re-run the whole pipeline.
async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let signature = headers
        .get("x-line-signature")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !verify_signature(&state.channel_secret, &body, signature) {
        tracing::warn!("rejected webhook with invalid signature");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid signature"})),
        );
    }

    let envelope: WebhookEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::warn!("unparseable webhook body: {err}");
            return (StatusCode::OK, Json(json!({"status": "ok"})));
        }
    };

    for event in &envelope.events {
        let Some((text, reply_token)) = event.as_text_message() else {
            continue;
        };

        tracing::info!("processing message ({} chars)", text.chars().count());
        let reply = state.pipeline.process_message(text).await;

        if let Err(err) = state.line.reply(reply_token, &reply).await {
            tracing::error!("failed to send reply: {err}");
        }
    }

    (StatusCode::OK, Json(json!({"status": "ok"})))
}
