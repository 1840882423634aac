//! Pure transformations from a collector payload to dashboard view models.

pub mod aggregate;
pub mod browser;
pub mod format;
pub mod palette;
pub mod summary;
pub mod table;

pub use aggregate::{aggregate, chart_dataset, TOP_N};
pub use browser::{BrowserView, CategoryWindow, ResourceBrowser};
pub use summary::reduce;
