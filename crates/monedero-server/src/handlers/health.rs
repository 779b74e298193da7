//! Health handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use monedero_core::{BackendInfo, GenerationBackend};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" when the ledger is readable and the backend (if configured) responds
    pub status: &'static str,
    pub ledger: LedgerHealth,
    pub ai: AiHealth,
}

#[derive(Debug, Serialize)]
pub struct LedgerHealth {
    pub path: String,
    pub readable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movements: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AiHealth {
    pub configured: bool,
    pub reachable: bool,
    #[serde(flatten)]
    pub backend: Option<BackendInfo>,
}

/// GET /health - Ledger readability and generation backend reachability
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let ledger = match state.store.load() {
        Ok(ledger) => LedgerHealth {
            path: state.store.path().display().to_string(),
            readable: true,
            movements: Some(ledger.movements.len()),
            error: None,
        },
        Err(e) => LedgerHealth {
            path: state.store.path().display().to_string(),
            readable: false,
            movements: None,
            error: Some(e.to_string()),
        },
    };

    let ai = match state.ai {
        Some(ref client) => AiHealth {
            configured: true,
            reachable: client.health_check().await,
            backend: Some(client.info()),
        },
        None => AiHealth {
            configured: false,
            reachable: false,
            backend: None,
        },
    };

    let status = if ledger.readable && (!ai.configured || ai.reachable) {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse { status, ledger, ai })
}
