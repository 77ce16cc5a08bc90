//! Expenses: the record type, the form for adding and editing them, and deletion.

mod core;
mod delete_endpoint;
mod form;
mod hierarchy_fields;
mod pages;
mod submit_endpoint;
mod view;

use axum::extract::FromRef;

use crate::{AppState, api::ApiClient};

pub use core::{Expense, ExpenseId, GstRequired, ReconciliationStatus};
pub use delete_endpoint::{EXPENSES_CHANGED_EVENT, delete_expense_endpoint};
pub use form::ExpenseForm;
pub use hierarchy_fields::{
    HierarchyForm, get_hierarchy_fields, hierarchy_fieldset, load_hierarchy_fields,
};
pub use pages::{get_edit_expense_page, get_new_expense_page};
pub use submit_endpoint::{create_expense_endpoint, update_expense_endpoint};

/// The state needed by the expense form and its endpoints.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The client for the expense API.
    pub api: ApiClient,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}
