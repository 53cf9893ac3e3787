//! Registration and daily attendance endpoints.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{ApiResponse, AppState};
use crate::error::{AppError, Rejection, Result};
use crate::models::{EntryRecord, ExitRecord};
use crate::registration::{self, Registration, RegistrationKind};
use crate::report::{self, DailyReport};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub employee_id: Option<i32>,
    pub kind: Option<RegistrationKind>,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
}

pub async fn register(
    State(state): State<AppState>,
    body: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Registration>>> {
    let Json(request) = body.map_err(|e| AppError::validation(e.body_text()))?;

    let employee_id = match request.employee_id {
        Some(id) if id > 0 => id,
        Some(_) => return Err(AppError::validation("employee_id must be a positive integer")),
        None => return Err(AppError::validation("employee_id is required")),
    };
    let kind = request
        .kind
        .ok_or_else(|| AppError::validation("kind must be \"entry\" or \"exit\""))?;

    let registration = registration::register(state.store.as_ref(), employee_id, kind, state.now(), &state.policy).await?;

    Ok(ApiResponse::new(registration.message(), registration))
}

pub async fn daily_report(
    State(state): State<AppState>,
    query: std::result::Result<Query<DateQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<DailyReport>>> {
    let Query(query) = query.map_err(|e| AppError::validation(e.body_text()))?;
    let date = query.date.unwrap_or_else(|| state.policy.local_date(state.now()));

    let params = state
        .store
        .active_shift_parameters()
        .await?
        .ok_or(Rejection::NoActiveParameters)?;

    let roster = state.directory.employees().await?;
    let entries = state.store.entries(Some(date)).await?;
    let exits = state.store.exits(Some(date)).await?;

    let report = report::daily_report(date, &roster, &entries, &exits, &params);
    Ok(ApiResponse::new("Records fetched successfully", report))
}

pub async fn list_entries(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<EntryRecord>>>> {
    let entries = state.store.entries(None).await?;
    Ok(ApiResponse::new("Entries fetched successfully", entries))
}

pub async fn list_exits(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<ExitRecord>>>> {
    let exits = state.store.exits(None).await?;
    Ok(ApiResponse::new("Exits fetched successfully", exits))
}
