//! Client-side views over fetched data: filtering, dashboard statistics,
//! page navigation, category lookup, and form validation.
//!
//! Nothing here performs I/O. Commands fetch, then hand the results to these
//! functions.

pub mod categories;
pub mod dashboard;
pub mod filter;
pub mod forms;
pub mod pagination;

pub use categories::{CategoryIndex, DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_NAME, palette};
pub use dashboard::{DUE_SOON_DAYS, DashboardStats, RECENT_TASKS};
pub use filter::{StatusFilter, TaskFilter};
pub use pagination::{DEFAULT_PAGE_WINDOW, page_window};
