//! Personnel directory pass-through.

use axum::Json;
use axum::extract::State;

use super::{ApiResponse, AppState};
use crate::error::Result;
use crate::models::{Department, Employee};

pub async fn list_employees(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Employee>>>> {
    let employees = state.directory.employees().await?;
    Ok(ApiResponse::new("Employees fetched successfully", employees))
}

pub async fn list_departments(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Department>>>> {
    let departments = state.directory.departments().await?;
    Ok(ApiResponse::new("Departments fetched successfully", departments))
}
