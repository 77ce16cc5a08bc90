//! Route handlers for the pages that show the expense form.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    api::wire::format_date,
    expense::{
        ExpenseForm, ExpenseId, ExpenseState,
        hierarchy_fields::load_hierarchy_fields,
        view::{FormMode, expense_form_view},
    },
    hierarchy::Level,
    timezone::local_today,
};

/// Renders the empty expense form with the date set to today.
pub async fn get_new_expense_page(State(state): State<ExpenseState>) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let form = ExpenseForm {
        expense_date: format_date(today),
        ..Default::default()
    };
    let hierarchy = load_hierarchy_fields(&state.api, &[], None, None).await;

    Ok(expense_form_view(&FormMode::Create, &form, &hierarchy, today).into_response())
}

/// Renders the expense form filled in with an existing expense.
///
/// The hierarchy selects are restored level by level so the saved group,
/// category and subcategory show up even though their lists depend on the
/// levels above them.
pub async fn get_edit_expense_page(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let expense = state
        .api
        .expense(expense_id)
        .await
        .inspect_err(|error| tracing::error!("Could not load expense {expense_id}: {error}"))?;

    let selected = [
        (Level::Project, expense.project_id()),
        (Level::Group, expense.group_id()),
        (Level::Category, expense.category_id()),
        (Level::Subcategory, expense.subcategory_id()),
    ];
    let hierarchy =
        load_hierarchy_fields(&state.api, &selected, None, expense.person_id()).await;
    let form = ExpenseForm::from_expense(&expense);
    let mode = FormMode::Edit {
        expense_id,
        bill_file: expense.bill_file.clone(),
    };

    Ok(expense_form_view(&mode, &form, &hierarchy, today).into_response())
}
