//! The bills table and its rows.

use maud::{Markup, html};

use crate::{
    api::wire::format_date,
    bills::download::bill_file_url,
    endpoints::{self, format_endpoint},
    expense::Expense,
    hierarchy::Entity,
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
};

/// The data columns of the bills table, in display order. The CSV export uses
/// the same columns.
pub(super) const COLUMNS: [&str; 17] = [
    "S.No",
    "Invoice No",
    "Project",
    "Person",
    "Category",
    "Subcategory",
    "Vendor",
    "Description",
    "Amount (₹)",
    "Tax (%)",
    "Tax Amt (₹)",
    "GST Required",
    "Total (₹)",
    "Payment",
    "Reconciliation",
    "Date",
    "Bill",
];

/// Shown in place of a missing bill file.
const NO_BILL: &str = "—";

pub(super) fn entity_name(entity: &Option<Entity>) -> &str {
    entity
        .as_ref()
        .map(|entity| entity.name.as_str())
        .unwrap_or_default()
}

pub(super) fn gst_label(expense: &Expense) -> &str {
    expense
        .gst_required
        .as_ref()
        .map(|gst| gst.as_str())
        .unwrap_or_default()
}

pub(super) fn reconciliation_label(expense: &Expense) -> &str {
    expense
        .reconciliation_status
        .as_ref()
        .map(|status| status.as_str())
        .unwrap_or_default()
}

fn currency_cell(amount: Option<f64>) -> String {
    amount.map(format_currency).unwrap_or_default()
}

/// Render `expenses` as a table. Serial numbers start at `first_serial`.
pub(super) fn expenses_table(expenses: &[Expense], first_serial: usize) -> Markup {
    html! {
        div class="relative overflow-x-auto shadow-md rounded-lg w-full"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        @for column in COLUMNS {
                            th scope="col" class="px-6 py-3 whitespace-nowrap" { (column) }
                        }
                        th scope="col" class="px-6 py-3" { "Actions" }
                    }
                }

                tbody
                {
                    @for (index, expense) in expenses.iter().enumerate() {
                        (expense_row(expense, first_serial + index))
                    }

                    @if expenses.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan=(COLUMNS.len() + 1) class="px-6 py-4 text-center"
                            {
                                "No expenses match these filters."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn expense_row(expense: &Expense, serial: usize) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_EXPENSE_VIEW, expense.id);
    let delete_url = format_endpoint(endpoints::EXPENSE_API, expense.id);
    let date = expense.date.map(format_date).unwrap_or_default();

    html! {
        tr class=(TABLE_ROW_STYLE) data-expense-id=(expense.id)
        {
            td class=(TABLE_CELL_STYLE) { (serial) }
            td class=(TABLE_CELL_STYLE) { (expense.invoice_number) }
            td class=(TABLE_CELL_STYLE) { (entity_name(&expense.project)) }
            td class=(TABLE_CELL_STYLE) { (entity_name(&expense.person)) }
            td class=(TABLE_CELL_STYLE) { (entity_name(&expense.category)) }
            td class=(TABLE_CELL_STYLE) { (entity_name(&expense.subcategory)) }
            td class=(TABLE_CELL_STYLE) { (expense.vendor) }
            td class=(TABLE_CELL_STYLE) { (expense.description) }
            td class={ (TABLE_CELL_STYLE) " text-right" } { (currency_cell(expense.amount)) }
            td class={ (TABLE_CELL_STYLE) " text-right" }
            {
                @if let Some(tax_percent) = expense.tax_percent { (tax_percent) }
            }
            td class={ (TABLE_CELL_STYLE) " text-right" } { (currency_cell(expense.tax_amount)) }
            td class=(TABLE_CELL_STYLE) { (gst_label(expense)) }
            td class={ (TABLE_CELL_STYLE) " text-right" } { (currency_cell(expense.total_amount)) }
            td class=(TABLE_CELL_STYLE) { (expense.payment_method) }
            td class=(TABLE_CELL_STYLE) { (reconciliation_label(expense)) }
            td class={ (TABLE_CELL_STYLE) " whitespace-nowrap" } { (date) }
            td class=(TABLE_CELL_STYLE)
            {
                @match &expense.bill_file {
                    Some(file_name) => {
                        a href=(bill_file_url(file_name)) class=(LINK_STYLE) download
                        {
                            "Download"
                        }
                    }
                    None => { (NO_BILL) }
                }
            }
            td class={ (TABLE_CELL_STYLE) " whitespace-nowrap" }
            {
                div class="flex gap-4"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        type="button"
                        class=(BUTTON_DELETE_STYLE)
                        hx-delete=(delete_url)
                        hx-confirm="Are you sure you want to delete this expense?"
                        hx-target="#alert-container"
                        hx-target-error="#alert-container"
                        hx-swap="innerHTML"
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}
