//! Dashboard module
//!
//! Provides an overview page with summary cards and charts computed by the
//! expense API, narrowed by a project, group, category and date filter bar.

mod cards;
mod charts;
mod handlers;
mod summary;

pub use handlers::{get_dashboard_filters, get_dashboard_page, get_dashboard_summary};
pub use summary::{DashboardSummary, SummaryFilter};
