use axum::{extract::State, Json};

use crate::handlers::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let status = state.dashboard.status().await;
    Json(serde_json::json!({
        "status": "ok",
        "dashboard": status.phase(),
    }))
}
