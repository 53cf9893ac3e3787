//! Shift parameter and shift overview endpoints.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use super::{ApiResponse, AppState};
use crate::error::{AppError, Rejection, Result};
use crate::models::{CreateShiftParameters, ShiftParameters};
use crate::report::{self, ShiftOverview};

pub async fn active_parameters(State(state): State<AppState>) -> Result<Json<ApiResponse<ShiftParameters>>> {
    let params = state
        .store
        .active_shift_parameters()
        .await?
        .ok_or(Rejection::NoActiveParameters)?;

    Ok(ApiResponse::new("Shift parameters fetched successfully", params))
}

pub async fn activate_parameters(
    State(state): State<AppState>,
    body: std::result::Result<Json<CreateShiftParameters>, JsonRejection>,
) -> Result<Json<ApiResponse<ShiftParameters>>> {
    let Json(request) = body.map_err(|e| AppError::validation(e.body_text()))?;
    let params = request.validate()?;

    let created = state.store.activate_shift_parameters(params).await?;
    tracing::info!(
        "Shift parameters {} activated: {}-{} tolerance={}m required={}h",
        created.id,
        created.expected_start.format("%H:%M"),
        created.expected_end.format("%H:%M"),
        created.tolerance_minutes,
        created.required_hours
    );

    Ok(ApiResponse::new("Shift parameters created successfully", created))
}

pub async fn overview(State(state): State<AppState>) -> Result<Json<ApiResponse<ShiftOverview>>> {
    let params = state
        .store
        .active_shift_parameters()
        .await?
        .ok_or(Rejection::NoActiveParameters)?;

    let entries = state.store.entries(None).await?;
    let exits = state.store.exits(None).await?;
    let today = state.policy.local_date(state.now());

    let overview = report::shift_overview(today, &entries, &exits, params);
    Ok(ApiResponse::new("Shifts processed successfully", overview))
}
