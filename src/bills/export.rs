//! CSV export of the filtered bills.

use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;

use crate::{
    Error,
    api::wire::format_date,
    bills::{
        BillsState,
        filter::group_by_category,
        query::BillsQuery,
        table::{COLUMNS, entity_name, gst_label, reconciliation_label},
    },
    expense::Expense,
};

const EXPORT_FILE_NAME: &str = "bills_export.csv";

fn number_field(value: Option<f64>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

/// Write `expenses` as CSV with the table's columns, numbering rows from one.
///
/// Fields with commas, quotes or line breaks are quoted.
pub(super) fn write_csv(expenses: &[Expense]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(COLUMNS)
        .map_err(|error| Error::CsvExport(error.to_string()))?;

    for (index, expense) in expenses.iter().enumerate() {
        let record = [
            (index + 1).to_string(),
            expense.invoice_number.clone(),
            entity_name(&expense.project).to_owned(),
            entity_name(&expense.person).to_owned(),
            entity_name(&expense.category).to_owned(),
            entity_name(&expense.subcategory).to_owned(),
            expense.vendor.clone(),
            expense.description.clone(),
            number_field(expense.amount),
            number_field(expense.tax_percent),
            number_field(expense.tax_amount),
            gst_label(expense).to_owned(),
            number_field(expense.total_amount),
            expense.payment_method.clone(),
            reconciliation_label(expense).to_owned(),
            expense.date.map(format_date).unwrap_or_default(),
            expense.bill_file.clone().unwrap_or_default(),
        ];

        writer
            .write_record(&record)
            .map_err(|error| Error::CsvExport(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvExport(error.to_string()))
}

/// A route handler that downloads the filtered bills as CSV.
///
/// With a `group` parameter and a project selection, only the expenses of that
/// category group are exported, matching the grouped tables on the bills page.
pub async fn get_bills_export(
    State(state): State<BillsState>,
    Query(query): Query<BillsQuery>,
) -> Response {
    let selection = query.selection();

    let expenses = match state.api.expenses().await {
        Ok(expenses) => expenses,
        Err(error) => {
            tracing::error!("Could not load expenses for export: {error}");
            return error.into_response();
        }
    };

    let filtered = selection.filter().apply(&expenses);

    let rows = match query.group.as_deref() {
        Some(group) if selection.is_grouped() => group_by_category(&filtered.visible)
            .into_iter()
            .find(|category_group| category_group.name == group)
            .map(|category_group| category_group.expenses)
            .unwrap_or_default(),
        _ => filtered.visible,
    };

    match write_csv(&rows) {
        Ok(body) => (
            [
                (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
                ),
            ],
            body,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not export {} expenses: {error}", rows.len());
            error.into_response()
        }
    }
}
