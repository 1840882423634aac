use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant};
use tracing::{error, info};

use crate::models::{
    ChartDataset, CostLineItem, CostSeries, PageSize, ReportingPeriod, ResourceCategory, SummaryMetrics,
    SummaryPayload,
};
use crate::pipeline::{aggregate, chart_dataset, reduce, ResourceBrowser};
use crate::source::SummarySource;

/// The only failure text shown to dashboard users; the cause is logged.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load data. Please try again later.";

/// Everything derived from one successfully fetched payload.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub metrics: SummaryMetrics,
    pub series: CostSeries,
    pub chart: ChartDataset,
    pub period: Option<ReportingPeriod>,
    pub cost_items: Vec<CostLineItem>,
    pub browser: ResourceBrowser,
    pub loaded_at: DateTime<Utc>,
}

impl Dashboard {
    pub fn from_payload(payload: SummaryPayload, items_per_page: PageSize) -> Self {
        let metrics = reduce(&payload);
        let series = aggregate(payload.cost_results());
        let chart = chart_dataset(&series);
        let browser = ResourceBrowser::new(&payload, items_per_page);
        let period = payload.cost_data.as_ref().and_then(|c| c.period());
        let cost_items = payload.cost_data.map(|c| c.results).unwrap_or_default();

        Self {
            metrics,
            series,
            chart,
            period,
            cost_items,
            browser,
            loaded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DashboardState {
    Loading,
    Failed { message: String },
    Ready(Box<Dashboard>),
}

/// Serializable snapshot of the dashboard headline data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DashboardStatus {
    Loading,
    Failed {
        error: String,
    },
    Ready {
        metrics: SummaryMetrics,
        series: CostSeries,
        chart: ChartDataset,
        period: Option<ReportingPeriod>,
        #[serde(rename = "loadedAt")]
        loaded_at: DateTime<Utc>,
    },
}

impl DashboardStatus {
    pub fn phase(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Failed { .. } => "failed",
            Self::Ready { .. } => "ready",
        }
    }
}

impl From<&DashboardState> for DashboardStatus {
    fn from(state: &DashboardState) -> Self {
        match state {
            DashboardState::Loading => Self::Loading,
            DashboardState::Failed { message } => Self::Failed { error: message.clone() },
            DashboardState::Ready(d) => Self::Ready {
                metrics: d.metrics.clone(),
                series: d.series.clone(),
                chart: d.chart.clone(),
                period: d.period.clone(),
                loaded_at: d.loaded_at,
            },
        }
    }
}

/// Returned when derived data is requested before a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotReady {
    Loading,
    Failed(String),
}

/// Owns the dashboard load lifecycle. Cloning shares the same state.
pub struct DashboardService<S> {
    source: Arc<S>,
    state: Arc<RwLock<DashboardState>>,
    load_guard: Arc<Mutex<()>>,
    items_per_page: PageSize,
}

impl<S> Clone for DashboardService<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            state: self.state.clone(),
            load_guard: self.load_guard.clone(),
            items_per_page: self.items_per_page,
        }
    }
}

impl<S: SummarySource + 'static> DashboardService<S> {
    pub fn new(source: S, items_per_page: PageSize) -> Self {
        Self {
            source: Arc::new(source),
            state: Arc::new(RwLock::new(DashboardState::Loading)),
            load_guard: Arc::new(Mutex::new(())),
            items_per_page,
        }
    }

    /// Fetches the summary and rebuilds every derived view. A call made while
    /// another load is in flight waits for it instead of fetching again.
    ///
    /// The fetch runs on its own task, so dropping the returned future does
    /// not leave the dashboard stuck in `Loading`.
    pub async fn load(&self) -> DashboardStatus {
        let service = self.clone();
        match tokio::spawn(async move { service.run_load().await }).await {
            Ok(status) => status,
            Err(e) => {
                error!(error = %e, "Dashboard load task aborted");
                let failed = DashboardState::Failed {
                    message: LOAD_FAILED_MESSAGE.into(),
                };
                let status = DashboardStatus::from(&failed);
                *self.state.write().await = failed;
                status
            }
        }
    }

    async fn run_load(&self) -> DashboardStatus {
        let _guard = match self.load_guard.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                info!("Dashboard load already in flight, waiting for it");
                let _wait = self.load_guard.lock().await;
                return self.status().await;
            }
        };

        *self.state.write().await = DashboardState::Loading;
        info!("Loading dashboard summary");

        let next = match self.source.get_summary().await {
            Ok(payload) => {
                let dashboard = Dashboard::from_payload(payload, self.items_per_page);
                info!(
                    ec2 = dashboard.metrics.count(ResourceCategory::Compute),
                    rds = dashboard.metrics.count(ResourceCategory::Database),
                    ebs = dashboard.metrics.count(ResourceCategory::Volume),
                    log_groups = dashboard.metrics.count(ResourceCategory::LogGroup),
                    total_cost = %dashboard.metrics.total_cost,
                    "Dashboard summary loaded"
                );
                DashboardState::Ready(Box::new(dashboard))
            }
            Err(e) => {
                error!(error = %e, "Failed to load dashboard summary");
                DashboardState::Failed {
                    message: LOAD_FAILED_MESSAGE.into(),
                }
            }
        };

        let status = DashboardStatus::from(&next);
        *self.state.write().await = next;
        status
    }

    /// Reloads every `period`, starting one period from now.
    pub fn spawn_periodic_refresh(&self, period: Duration) -> JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                info!("Running periodic dashboard refresh");
                let status = service.load().await;
                if let DashboardStatus::Failed { error } = &status {
                    error!(%error, "Periodic dashboard refresh failed");
                }
            }
        })
    }

    pub async fn status(&self) -> DashboardStatus {
        DashboardStatus::from(&*self.state.read().await)
    }

    pub async fn read<T>(&self, f: impl FnOnce(&Dashboard) -> T) -> Result<T, NotReady> {
        match &*self.state.read().await {
            DashboardState::Ready(dashboard) => Ok(f(dashboard)),
            DashboardState::Loading => Err(NotReady::Loading),
            DashboardState::Failed { message } => Err(NotReady::Failed(message.clone())),
        }
    }

    pub async fn update<T>(&self, f: impl FnOnce(&mut Dashboard) -> T) -> Result<T, NotReady> {
        match &mut *self.state.write().await {
            DashboardState::Ready(dashboard) => Ok(f(dashboard)),
            DashboardState::Loading => Err(NotReady::Loading),
            DashboardState::Failed { message } => Err(NotReady::Failed(message.clone())),
        }
    }
}
