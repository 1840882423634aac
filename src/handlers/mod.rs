pub mod costs;
pub mod dashboard;
pub mod health;
pub mod resources;

use crate::dashboard::DashboardService;
use crate::source::HttpSummarySource;

/// Shared application state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardService<HttpSummarySource>,
}
