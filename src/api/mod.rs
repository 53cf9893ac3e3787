//! HTTP boundary.
//!
//! Successful responses are `{ "message", "data" }`; failures are
//! `{ "message" }` with the status chosen by [`AppError`](crate::AppError).

mod attendance;
mod directory;
mod shift;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::directory::Directory;
use crate::error::Result;
use crate::registration::RegistrationPolicy;
use crate::store::AttendanceStore;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AttendanceStore>,
    pub directory: Arc<dyn Directory>,
    pub policy: Arc<RegistrationPolicy>,
    /// Source of the current instant.
    pub clock: fn() -> DateTime<Utc>,
}

impl AppState {
    pub fn new(store: Arc<dyn AttendanceStore>, directory: Arc<dyn Directory>, policy: RegistrationPolicy) -> Self {
        Self {
            store,
            directory,
            policy: Arc::new(policy),
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: &'static str,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(message: &'static str, data: T) -> Json<Self> {
        Json(Self { message, data })
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/employees", get(directory::list_employees))
        .route("/api/departments", get(directory::list_departments))
        .route(
            "/api/attendance",
            get(attendance::daily_report).post(attendance::register),
        )
        .route("/api/attendance/entries", get(attendance::list_entries))
        .route("/api/attendance/exits", get(attendance::list_exits))
        .route("/api/shifts", get(shift::overview))
        .route(
            "/api/shift-parameters",
            get(shift::active_parameters).post(shift::activate_parameters),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<Json<ApiResponse<&'static str>>> {
    state.store.ping().await?;
    Ok(ApiResponse::new("Service is healthy", "ok"))
}
