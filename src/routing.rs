//! Application router configuration.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    bills::{get_bill_file, get_bills_content, get_bills_export, get_bills_page},
    dashboard::{get_dashboard_filters, get_dashboard_page, get_dashboard_summary},
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_edit_expense_page,
        get_hierarchy_fields, get_new_expense_page, update_expense_endpoint,
    },
    hierarchy::create_entity_endpoint,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
};

/// The largest expense form, bill file included, that the server accepts.
pub const MAX_EXPENSE_FORM_BYTES: usize = 25 * 1024 * 1024;

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let pages = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::DASHBOARD_SUMMARY, get(get_dashboard_summary))
        .route(endpoints::DASHBOARD_FILTERS, get(get_dashboard_filters))
        .route(endpoints::BILLS_VIEW, get(get_bills_page))
        .route(endpoints::BILLS_CONTENT, get(get_bills_content))
        .route(endpoints::BILLS_EXPORT, get(get_bills_export))
        .route(endpoints::BILL_FILE, get(get_bill_file))
        .route(endpoints::NEW_EXPENSE_VIEW, get(get_new_expense_page))
        .route(endpoints::EDIT_EXPENSE_VIEW, get(get_edit_expense_page))
        .route(endpoints::EXPENSE_HIERARCHY, get(get_hierarchy_fields))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    // The expense form carries the bill file, so it gets a larger body limit.
    let expense_routes = Router::new()
        .route(endpoints::EXPENSES_API, post(create_expense_endpoint))
        .route(
            endpoints::EXPENSE_API,
            put(update_expense_endpoint).delete(delete_expense_endpoint),
        )
        .layer(DefaultBodyLimit::max(MAX_EXPENSE_FORM_BYTES));

    // Form submissions are sent by HTMX and answer with alerts or HX-Redirect headers.
    let api_routes = Router::new()
        .merge(expense_routes)
        .route(endpoints::HIERARCHY_API, post(create_entity_endpoint));

    pages
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
