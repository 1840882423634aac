//! Sortable, paginated projection over one resource collection.

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{FieldValue, PageSize, PageState, Record, ResourceCategory, SortDirection, SortState};

/// Most numbered page buttons shown at once.
pub const MAX_PAGE_BUTTONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    pub key: &'static str,
    pub title: &'static str,
    pub sort_indicator: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow<R> {
    pub key: String,
    pub cells: Vec<String>,
    pub record: R,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageControls {
    pub current: u32,
    pub pages: Vec<u32>,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Everything needed to render the visible slice of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableWindow<R> {
    pub category: ResourceCategory,
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<TableRow<R>>,
    pub total_items: usize,
    pub total_pages: u32,
    pub current_page: u32,
    pub items_per_page: PageSize,
    pub page_range_label: String,
    pub sort: SortState,
    pub controls: PageControls,
    pub empty_message: Option<&'static str>,
}

/// Sort and pagination state for one category, plus its records.
#[derive(Debug, Clone)]
pub struct TableView<R> {
    records: Vec<R>,
    /// Indices into `records` in display order.
    order: Vec<usize>,
    sort: SortState,
    page: PageState,
}

impl<R: Record + Clone> TableView<R> {
    pub fn new(records: Vec<R>, items_per_page: PageSize) -> Self {
        let order = (0..records.len()).collect();
        Self {
            records,
            order,
            sort: SortState::default(),
            page: PageState::new(items_per_page),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn page_state(&self) -> PageState {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.page.total_pages(self.records.len())
    }

    /// Toggles sorting on `key` and re-sorts. The current page is kept.
    pub fn set_sort(&mut self, key: &str) {
        self.sort.toggle(key);
        self.resort();
    }

    pub fn set_page(&mut self, page: i64) {
        self.page.go_to(page, self.records.len());
    }

    pub fn set_items_per_page(&mut self, items_per_page: PageSize) {
        self.page = PageState::new(items_per_page);
    }

    pub fn reset_page(&mut self) {
        self.page.current_page = 1;
    }

    fn resort(&mut self) {
        let Some(key) = self.sort.key.as_deref() else {
            return;
        };
        let direction = self.sort.direction;
        let values: Vec<Option<FieldValue>> = self.records.iter().map(|r| r.field(key)).collect();

        // stable sort from original order keeps ties deterministic
        let mut order: Vec<usize> = (0..self.records.len()).collect();
        order.sort_by(|&a, &b| {
            let ordering = compare_fields(values[a].as_ref(), values[b].as_ref());
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        self.order = order;
    }

    pub fn view(&self) -> TableWindow<R> {
        let total_items = self.records.len();
        let total_pages = self.total_pages();
        let per_page = self.page.items_per_page.get() as usize;
        let start = self.page.offset().min(total_items);
        let end = (start + per_page).min(total_items);

        let rows = self.order[start..end]
            .iter()
            .map(|&i| {
                let record = &self.records[i];
                TableRow {
                    key: record.identity().to_string(),
                    cells: record.cells(),
                    record: record.clone(),
                }
            })
            .collect();

        let columns = R::COLUMNS
            .iter()
            .map(|c| ColumnHeader {
                key: c.key,
                title: c.title,
                sort_indicator: self.sort.indicator_for(c.key),
            })
            .collect();

        let first = if total_items == 0 { 0 } else { start + 1 };

        TableWindow {
            category: R::CATEGORY,
            columns,
            rows,
            total_items,
            total_pages,
            current_page: self.page.current_page,
            items_per_page: self.page.items_per_page,
            page_range_label: format!("Showing {first} to {end} of {total_items} entries"),
            sort: self.sort.clone(),
            controls: page_controls(self.page.current_page, total_pages),
            empty_message: (total_items == 0).then(|| R::CATEGORY.empty_message()),
        }
    }
}

/// Total order over optional cell values: absent < numbers < timestamps < text.
pub fn compare_fields(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    fn rank(value: Option<&FieldValue>) -> u8 {
        match value {
            None => 0,
            Some(FieldValue::Number(_)) => 1,
            Some(FieldValue::Timestamp(_)) => 2,
            Some(FieldValue::Text(_)) => 3,
        }
    }

    match (a, b) {
        (Some(FieldValue::Number(x)), Some(FieldValue::Number(y))) => x.total_cmp(y),
        (Some(FieldValue::Timestamp(x)), Some(FieldValue::Timestamp(y))) => x.cmp(y),
        (Some(FieldValue::Text(x)), Some(FieldValue::Text(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Up to five page numbers centered on `current`, clamped to `[1, total_pages]`.
pub fn page_controls(current: u32, total_pages: u32) -> PageControls {
    if total_pages == 0 {
        return PageControls {
            current,
            pages: Vec::new(),
            prev_enabled: false,
            next_enabled: false,
        };
    }

    let mut start = current.saturating_sub(MAX_PAGE_BUTTONS / 2).max(1);
    let end = (start + MAX_PAGE_BUTTONS - 1).min(total_pages);
    if end - start + 1 < MAX_PAGE_BUTTONS {
        start = end.saturating_sub(MAX_PAGE_BUTTONS - 1).max(1);
    }

    PageControls {
        current,
        pages: (start..=end).collect(),
        prev_enabled: current > 1,
        next_enabled: current < total_pages,
    }
}

/// Object-safe controls shared by every `TableView`, whatever its record type.
pub trait TableControls {
    fn set_sort(&mut self, key: &str);
    fn set_page(&mut self, page: i64);
    fn set_items_per_page(&mut self, items_per_page: PageSize);
    fn reset_page(&mut self);
    fn len(&self) -> usize;
}

impl<R: Record + Clone> TableControls for TableView<R> {
    fn set_sort(&mut self, key: &str) {
        TableView::set_sort(self, key)
    }

    fn set_page(&mut self, page: i64) {
        TableView::set_page(self, page)
    }

    fn set_items_per_page(&mut self, items_per_page: PageSize) {
        TableView::set_items_per_page(self, items_per_page)
    }

    fn reset_page(&mut self) {
        TableView::reset_page(self)
    }

    fn len(&self) -> usize {
        TableView::len(self)
    }
}
