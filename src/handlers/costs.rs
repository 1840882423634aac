use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::CostLineItem;
use crate::pipeline::format::format_currency_total;

pub async fn get_series(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let body = state
        .dashboard
        .read(|d| {
            serde_json::json!({
                "series": d.series,
                "chart": d.chart,
                "total": d.metrics.total_cost,
                "currency": d.metrics.cost_unit,
                "display": format_currency_total(&d.cost_items, &d.metrics.cost_unit),
                "period": d.period,
            })
        })
        .await?;
    Ok(Json(body))
}

pub async fn export_csv(State(state): State<AppState>) -> Result<Response, AppError> {
    let csv = state.dashboard.read(|d| render_csv(&d.cost_items)).await??;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=costs.csv"),
        ],
        csv,
    )
        .into_response())
}

fn render_csv(items: &[CostLineItem]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["service", "amount", "unit", "date"])?;
    for item in items {
        wtr.write_record([
            item.service_name(),
            item.amount.as_deref().unwrap_or(""),
            item.unit.as_deref().unwrap_or(""),
            item.date.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = wtr.into_inner().map_err(|e| anyhow::anyhow!("Failed to flush CSV: {e}"))?;
    Ok(String::from_utf8(bytes)?)
}
