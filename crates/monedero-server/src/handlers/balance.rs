//! Balance handler

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{AppError, AppState};
use monedero_core::BalanceSummary;

/// GET /balance - Income, expenses and balance over the whole ledger
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BalanceSummary>, AppError> {
    let summary = monedero_core::get_balance(&state.store).map_err(AppError::ledger)?;
    Ok(Json(summary))
}
