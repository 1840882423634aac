
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }
}

/// Which column a table is sorted by. Starts unsorted and ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    /// Same key flips the direction, a new key starts ascending.
    pub fn toggle(&mut self, key: &str) {
        if self.key.as_deref() == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(key.to_string());
            self.direction = SortDirection::Ascending;
        }
    }

    pub fn indicator_for(&self, key: &str) -> Option<&'static str> {
        (self.key.as_deref() == Some(key)).then(|| self.direction.indicator())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("items per page must be one of 5, 10, 25 or 50, got {0}")]
pub struct InvalidPageSize(pub u32);

/// Allowed rows-per-page choices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PageSize {
    Five,
    #[default]
    Ten,
    TwentyFive,
    Fifty,
}

impl PageSize {
    pub const ALL: [Self; 4] = [Self::Five, Self::Ten, Self::TwentyFive, Self::Fifty];

    pub fn get(self) -> u32 {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
            Self::TwentyFive => 25,
            Self::Fifty => 50,
        }
    }
}

impl TryFrom<u32> for PageSize {
    type Error = InvalidPageSize;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or(InvalidPageSize(value))
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

/// Current page (1-based) and page size of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub current_page: u32,
    pub items_per_page: PageSize,
}

impl PageState {
    pub fn new(items_per_page: PageSize) -> Self {
        Self {
            current_page: 1,
            items_per_page,
        }
    }

    /// `ceil(total_items / items_per_page)`, zero for an empty table.
    pub fn total_pages(&self, total_items: usize) -> u32 {
        let per_page = self.items_per_page.get() as usize;
        let pages = total_items.div_ceil(per_page);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Moves to `page`, clamped into `[1, max(1, total_pages)]`.
    pub fn go_to(&mut self, page: i64, total_items: usize) {
        let last = i64::from(self.total_pages(total_items).max(1));
        self.current_page = page.clamp(1, last) as u32;
    }

    pub fn offset(&self) -> usize {
        (self.current_page as usize - 1) * self.items_per_page.get() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_toggle_alternates() {
        let mut sort = SortState::default();
        assert_eq!(sort.key, None);

        sort.toggle("name");
        assert_eq!(sort.direction, SortDirection::Ascending);
        sort.toggle("name");
        assert_eq!(sort.direction, SortDirection::Descending);
        sort.toggle("name");
        assert_eq!(sort.direction, SortDirection::Ascending);

        sort.toggle("id");
        assert_eq!(sort.key.as_deref(), Some("id"));
        assert_eq!(sort.direction, SortDirection::Ascending);
        assert_eq!(sort.indicator_for("id"), Some("↑"));
        assert_eq!(sort.indicator_for("name"), None);
    }

    #[test]
    fn test_page_size_validation() {
        assert_eq!(PageSize::try_from(25), Ok(PageSize::TwentyFive));
        assert_eq!(PageSize::try_from(7), Err(InvalidPageSize(7)));
        assert_eq!(
            InvalidPageSize(7).to_string(),
            "items per page must be one of 5, 10, 25 or 50, got 7"
        );
        let parsed: Result<PageSize, _> = serde_json::from_str("50");
        assert_eq!(parsed.unwrap(), PageSize::Fifty);
        assert!(serde_json::from_str::<PageSize>("3").is_err());
    }

    #[test]
    fn test_page_state_bounds() {
        let mut page = PageState::new(PageSize::Ten);
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(23), 3);

        page.go_to(5, 23);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.offset(), 20);

        page.go_to(-2, 23);
        assert_eq!(page.current_page, 1);

        page.go_to(4, 0);
        assert_eq!(page.current_page, 1);
    }
}
