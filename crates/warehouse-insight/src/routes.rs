use std::sync::Arc;

use a2a_host::ServerState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::config::Config;

pub const LIVENESS_TEXT: &str = "A2A Warehouse Insight Agent (ADK based) is alive!";
pub const ORD_DOCUMENT_ROUTE: &str = "/open-resource-discovery/v1/documents/1";
pub const ORD_NOT_FOUND_DETAIL: &str = "ORD document not found.";

/// Plain-text liveness probe on `GET /`.
pub async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

/// Health endpoint reporting the served agent's name.
pub async fn health(State(state): State<ServerState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "agent_name": state.agent_card.name,
    }))
}

/// Serves the Open Resource Discovery document from disk. The file is read
/// on every request so it can appear or change without a restart.
pub async fn ord_document(State(config): State<Arc<Config>>) -> Response {
    match tokio::fs::read(&config.ord_document_path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "application/json")], bytes).into_response(),
        Err(err) => {
            tracing::warn!(
                path = %config.ord_document_path.display(),
                error = %err,
                "ORD document not found"
            );
            (StatusCode::NOT_FOUND, ORD_NOT_FOUND_DETAIL).into_response()
        }
    }
}
