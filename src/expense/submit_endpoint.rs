//! Defines the endpoints that save the expense form.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    Error, endpoints,
    expense::{ExpenseForm, ExpenseId, ExpenseState},
};

async fn read_valid_form(multipart: Multipart) -> Result<ExpenseForm, Error> {
    let form = ExpenseForm::from_multipart(multipart).await?;
    form.validate()?;

    Ok(form)
}

fn saved_response() -> Response {
    (
        HxRedirect(endpoints::BILLS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

/// A route handler for recording a new expense, redirects to the bills page on success.
///
/// Missing required fields are reported before anything is sent to the expense API.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    multipart: Multipart,
) -> Response {
    let form = match read_valid_form(multipart).await {
        Ok(form) => form,
        Err(error) => return error.into_alert_response(),
    };

    match state.api.create_expense(form).await {
        Ok(()) => saved_response(),
        Err(error) => {
            tracing::error!("Could not create expense: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for updating an expense, redirects to the bills page on success.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    multipart: Multipart,
) -> Response {
    let form = match read_valid_form(multipart).await {
        Ok(form) => form,
        Err(error) => return error.into_alert_response(),
    };

    match state.api.update_expense(expense_id, form).await {
        Ok(()) => saved_response(),
        Err(error) => {
            tracing::error!("Could not update expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}
