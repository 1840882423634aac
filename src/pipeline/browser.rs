use serde::Serialize;

use super::table::{TableControls, TableView, TableWindow};
use crate::models::{
    ComputeInstance, DatabaseInstance, LogGroup, PageSize, ResourceCategory, SummaryPayload, Volume,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryWindow {
    Compute(TableWindow<ComputeInstance>),
    Database(TableWindow<DatabaseInstance>),
    Volume(TableWindow<Volume>),
    LogGroup(TableWindow<LogGroup>),
}

impl CategoryWindow {
    pub fn total_items(&self) -> usize {
        match self {
            Self::Compute(w) => w.total_items,
            Self::Database(w) => w.total_items,
            Self::Volume(w) => w.total_items,
            Self::LogGroup(w) => w.total_items,
        }
    }

    pub fn current_page(&self) -> u32 {
        match self {
            Self::Compute(w) => w.current_page,
            Self::Database(w) => w.current_page,
            Self::Volume(w) => w.current_page,
            Self::LogGroup(w) => w.current_page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabSummary {
    pub category: ResourceCategory,
    pub label: &'static str,
    pub count: usize,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowserView {
    pub active: ResourceCategory,
    pub tabs: Vec<TabSummary>,
    pub table: CategoryWindow,
}

/// The tabbed resource tables: one independent `TableView` per category and a
/// single shared rows-per-page selector.
#[derive(Debug, Clone)]
pub struct ResourceBrowser {
    active: ResourceCategory,
    items_per_page: PageSize,
    compute: TableView<ComputeInstance>,
    databases: TableView<DatabaseInstance>,
    volumes: TableView<Volume>,
    log_groups: TableView<LogGroup>,
}

impl ResourceBrowser {
    pub fn new(payload: &SummaryPayload, items_per_page: PageSize) -> Self {
        Self {
            active: ResourceCategory::Compute,
            items_per_page,
            compute: TableView::new(payload.ec2_instances.clone(), items_per_page),
            databases: TableView::new(payload.rds_instances.clone(), items_per_page),
            volumes: TableView::new(payload.ebs_volumes.clone(), items_per_page),
            log_groups: TableView::new(payload.cloud_watch_log_groups.clone(), items_per_page),
        }
    }

    pub fn active(&self) -> ResourceCategory {
        self.active
    }

    pub fn items_per_page(&self) -> PageSize {
        self.items_per_page
    }

    fn table(&self, category: ResourceCategory) -> &dyn TableControls {
        match category {
            ResourceCategory::Compute => &self.compute,
            ResourceCategory::Database => &self.databases,
            ResourceCategory::Volume => &self.volumes,
            ResourceCategory::LogGroup => &self.log_groups,
        }
    }

    fn table_mut(&mut self, category: ResourceCategory) -> &mut dyn TableControls {
        match category {
            ResourceCategory::Compute => &mut self.compute,
            ResourceCategory::Database => &mut self.databases,
            ResourceCategory::Volume => &mut self.volumes,
            ResourceCategory::LogGroup => &mut self.log_groups,
        }
    }

    pub fn count(&self, category: ResourceCategory) -> usize {
        self.table(category).len()
    }

    /// Makes `category` the active tab and starts it on page 1. Sort state of
    /// every tab is left untouched.
    pub fn switch_category(&mut self, category: ResourceCategory) {
        self.active = category;
        self.table_mut(category).reset_page();
    }

    pub fn set_sort(&mut self, key: &str) {
        let active = self.active;
        self.table_mut(active).set_sort(key);
    }

    pub fn set_page(&mut self, page: i64) {
        let active = self.active;
        self.table_mut(active).set_page(page);
    }

    pub fn set_items_per_page(&mut self, items_per_page: PageSize) {
        self.items_per_page = items_per_page;
        for category in ResourceCategory::ALL {
            self.table_mut(category).set_items_per_page(items_per_page);
        }
    }

    pub fn window(&self, category: ResourceCategory) -> CategoryWindow {
        match category {
            ResourceCategory::Compute => CategoryWindow::Compute(self.compute.view()),
            ResourceCategory::Database => CategoryWindow::Database(self.databases.view()),
            ResourceCategory::Volume => CategoryWindow::Volume(self.volumes.view()),
            ResourceCategory::LogGroup => CategoryWindow::LogGroup(self.log_groups.view()),
        }
    }

    pub fn view(&self) -> BrowserView {
        let tabs = ResourceCategory::ALL
            .into_iter()
            .map(|category| TabSummary {
                category,
                label: category.label(),
                count: self.count(category),
                active: category == self.active,
            })
            .collect();

        BrowserView {
            active: self.active,
            tabs,
            table: self.window(self.active),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortDirection;

    fn payload() -> SummaryPayload {
        let instances: Vec<serde_json::Value> = (0..12)
            .map(|i| serde_json::json!({"id": format!("i-{i:02}"), "name": format!("web-{i}")}))
            .collect();
        serde_json::from_value(serde_json::json!({
            "ec2Instances": instances,
            "rdsInstances": [{"id": "db-b", "allocatedStorage": 100}, {"id": "db-a", "allocatedStorage": 20}],
            "cloudWatchLogGroups": [{"name": "/aws/a", "storedBytes": 10}]
        }))
        .unwrap()
    }

    #[test]
    fn test_starts_on_compute_tab() {
        let browser = ResourceBrowser::new(&payload(), PageSize::Ten);
        let view = browser.view();
        assert_eq!(view.active, ResourceCategory::Compute);
        assert_eq!(view.table.total_items(), 12);
        let counts: Vec<usize> = view.tabs.iter().map(|t| t.count).collect();
        assert_eq!(counts, vec![12, 2, 0, 1]);
        assert!(view.tabs[0].active);
    }

    #[test]
    fn test_switch_category_resets_page_but_keeps_sort() {
        let mut browser = ResourceBrowser::new(&payload(), PageSize::Five);
        browser.set_sort("id");
        browser.set_sort("id");
        browser.set_page(3);
        assert_eq!(browser.view().table.current_page(), 3);

        browser.switch_category(ResourceCategory::Database);
        browser.set_sort("allocatedStorage");

        browser.switch_category(ResourceCategory::Compute);
        let CategoryWindow::Compute(window) = browser.view().table else {
            panic!("expected compute window");
        };
        assert_eq!(window.current_page, 1);
        assert_eq!(window.sort.key.as_deref(), Some("id"));
        assert_eq!(window.sort.direction, SortDirection::Descending);
        assert_eq!(window.rows[0].key, "i-11");

        let CategoryWindow::Database(db) = browser.window(ResourceCategory::Database) else {
            panic!("expected database window");
        };
        assert_eq!(db.rows[0].key, "db-a");
    }

    #[test]
    fn test_items_per_page_applies_to_all_tabs() {
        let mut browser = ResourceBrowser::new(&payload(), PageSize::Ten);
        browser.set_page(2);
        browser.set_items_per_page(PageSize::TwentyFive);
        assert_eq!(browser.items_per_page(), PageSize::TwentyFive);

        let CategoryWindow::Compute(window) = browser.view().table else {
            panic!("expected compute window");
        };
        assert_eq!(window.current_page, 1);
        assert_eq!(window.rows.len(), 12);
        assert_eq!(window.total_pages, 1);
    }

    #[test]
    fn test_empty_tab_view() {
        let mut browser = ResourceBrowser::new(&payload(), PageSize::Ten);
        browser.switch_category(ResourceCategory::Volume);
        browser.set_page(4);
        let view = browser.view();
        assert_eq!(view.table.total_items(), 0);
        assert_eq!(view.table.current_page(), 1);
    }
}
