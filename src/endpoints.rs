//! The endpoint URIs served by the app.
//!
//! For endpoints that take a parameter, e.g., '/expenses/{expense_id}/edit', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page with summary cards and charts.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The fragment with the summary cards and charts for the selected filters.
pub const DASHBOARD_SUMMARY: &str = "/dashboard/summary";
/// The fragment with the project, group and category selects of the dashboard filter bar.
pub const DASHBOARD_FILTERS: &str = "/dashboard/filters";
/// The page listing expenses (bills) with filters and totals.
pub const BILLS_VIEW: &str = "/bills";
/// The fragment with the bills filter bar, totals and tables.
pub const BILLS_CONTENT: &str = "/bills/content";
/// The CSV export of the filtered bills.
pub const BILLS_EXPORT: &str = "/bills/export.csv";
/// The download link for a bill file attached to an expense.
pub const BILL_FILE: &str = "/bills/files/{filename}";
/// The page for recording a new expense.
pub const NEW_EXPENSE_VIEW: &str = "/expenses/new";
/// The page for editing an existing expense.
pub const EDIT_EXPENSE_VIEW: &str = "/expenses/{expense_id}/edit";
/// The fragment with the cascading hierarchy selects of the expense form.
pub const EXPENSE_HIERARCHY: &str = "/expenses/hierarchy";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create an expense.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route to update or delete a single expense.
pub const EXPENSE_API: &str = "/api/expenses/{expense_id}";
/// The route to add a project, group, category, subcategory or person.
pub const HIERARCHY_API: &str = "/api/hierarchy/{kind}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/expenses/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl std::fmt::Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
