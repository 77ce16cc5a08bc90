use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    expense::{ExpenseId, ExpenseState},
};

/// The htmx event sent after an expense is deleted so the bills table reloads.
pub const EXPENSES_CHANGED_EVENT: &str = "expenses-changed";

/// A route handler for deleting an expense, responds with an alert.
///
/// On success the response also triggers [EXPENSES_CHANGED_EVENT], which
/// reloads the bills table and its totals.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    match state.api.delete_expense(expense_id).await {
        Ok(()) => (
            [("hx-trigger", EXPENSES_CHANGED_EVENT)],
            Alert::SuccessSimple {
                message: "Expense deleted successfully".to_owned(),
            }
            .into_html(),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not delete expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}
