use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::{PageSize, ResourceCategory};
use crate::pipeline::BrowserView;

#[derive(Debug, Deserialize)]
pub struct TabRequest {
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub page: i64,
}

#[derive(Debug, Deserialize)]
pub struct PageSizeRequest {
    pub items_per_page: u32,
}

pub async fn get_view(State(state): State<AppState>) -> Result<Json<BrowserView>, AppError> {
    let view = state.dashboard.read(|d| d.browser.view()).await?;
    Ok(Json(view))
}

pub async fn switch_tab(
    State(state): State<AppState>,
    Json(req): Json<TabRequest>,
) -> Result<Json<BrowserView>, AppError> {
    let category: ResourceCategory = req.category.parse()?;
    let view = state
        .dashboard
        .update(|d| {
            d.browser.switch_category(category);
            d.browser.view()
        })
        .await?;
    Ok(Json(view))
}

pub async fn sort(
    State(state): State<AppState>,
    Json(req): Json<SortRequest>,
) -> Result<Json<BrowserView>, AppError> {
    if req.key.trim().is_empty() {
        return Err(AppError::bad_request("Sort key must not be empty"));
    }

    let view = state
        .dashboard
        .update(|d| {
            d.browser.set_sort(req.key.trim());
            d.browser.view()
        })
        .await?;
    Ok(Json(view))
}

pub async fn set_page(
    State(state): State<AppState>,
    Json(req): Json<PageRequest>,
) -> Result<Json<BrowserView>, AppError> {
    let view = state
        .dashboard
        .update(|d| {
            d.browser.set_page(req.page);
            d.browser.view()
        })
        .await?;
    Ok(Json(view))
}

pub async fn set_page_size(
    State(state): State<AppState>,
    Json(req): Json<PageSizeRequest>,
) -> Result<Json<BrowserView>, AppError> {
    let size = PageSize::try_from(req.items_per_page)?;
    let view = state
        .dashboard
        .update(|d| {
            d.browser.set_items_per_page(size);
            d.browser.view()
        })
        .await?;
    Ok(Json(view))
}
