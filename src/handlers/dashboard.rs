use axum::{extract::State, Json};

use crate::dashboard::DashboardStatus;
use crate::handlers::AppState;

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardStatus> {
    Json(state.dashboard.status().await)
}

/// Re-fetches the collector summary. Concurrent refreshes share one fetch.
pub async fn refresh(State(state): State<AppState>) -> Json<DashboardStatus> {
    Json(state.dashboard.load().await)
}
