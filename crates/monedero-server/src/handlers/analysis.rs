//! Generation-backed analysis handlers

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState};
use monedero_core::{CategorizedTotals, DateRange};

/// Request body for categorization
///
/// Every field is optional; an empty body categorizes the whole ledger.
#[derive(Debug, Default, Deserialize)]
pub struct CategorizeRequest {
    /// Inclusive start date (YYYY-MM-DD)
    pub fecha_inicio: Option<String>,
    /// Inclusive end date (YYYY-MM-DD)
    pub fecha_fin: Option<String>,
    /// Extra instructions appended to the prompt
    pub prompt: Option<String>,
}

/// Request body for free-text analysis
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub respuesta: String,
}

/// Decode an optional JSON body; an empty body yields the defaults
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::bad_request(&format!("Invalid JSON body: {}", e)))
}

/// POST /analizar_categorias - Per-category totals for the (optionally filtered) ledger
pub async fn categorize(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CategorizedTotals>, AppError> {
    let request: CategorizeRequest = parse_body(&body)?;

    let range = DateRange::parse(request.fecha_inicio.as_deref(), request.fecha_fin.as_deref())
        .map_err(|e| AppError::bad_request(&e.to_string()))?;

    let pipeline = state.pipeline()?;
    let ledger = state.store.load().map_err(AppError::ledger)?;

    let totals = pipeline
        .categorize(&ledger, range.as_ref(), request.prompt.as_deref())
        .await
        .map_err(AppError::generation)?;

    info!(
        movements = ledger.movements.len(),
        filtered = range.is_some(),
        "Categorization completed"
    );
    Ok(Json(totals))
}

/// POST /analizar - Free-text answer about the whole ledger
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let request: AnalyzeRequest = parse_body(&body)?;

    let instruction = request.prompt.unwrap_or_default();
    if instruction.trim().is_empty() {
        return Err(AppError::bad_request("Field 'prompt' is required"));
    }

    let analyst = state.analyst()?;
    let ledger = state.store.load().map_err(AppError::ledger)?;

    let respuesta = analyst
        .analyze(&ledger, &instruction)
        .await
        .map_err(AppError::generation)?;

    Ok(Json(AnalyzeResponse { respuesta }))
}
