use maud::{Markup, html};
use time::Date;

use crate::{
    bills::bill_file_url,
    endpoints::{self, format_endpoint},
    expense::{
        ExpenseForm, ExpenseId, GstRequired, ReconciliationStatus,
        form::BILL_FILE_FIELD,
        hierarchy_fields::{HierarchyFields, hierarchy_fieldset},
    },
    hierarchy::lookup_failed_alert,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
};

/// Whether the form records a new expense or changes an existing one.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    Edit {
        expense_id: ExpenseId,
        /// The bill file already stored for the expense.
        bill_file: Option<String>,
    },
}

fn text_input(name: &str, label: &str, value: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }
            input
                type="text"
                id=(name)
                name=(name)
                value=(value)
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn number_input(name: &str, label: &str, value: &str, required: bool) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }
            input
                type="number"
                step="0.01"
                id=(name)
                name=(name)
                value=(value)
                placeholder="0.00"
                required[required]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn text_area(name: &str, label: &str, value: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }
            textarea id=(name) name=(name) rows="2" class=(FORM_TEXT_INPUT_STYLE) { (value) }
        }
    }
}

/// A select over `choices`. A saved `value` that is not one of them is kept as
/// an extra option so saving the form sends it back unchanged.
fn choice_select(name: &str, label: &str, choices: &[&str], value: &str) -> Markup {
    let is_unlisted = !value.is_empty()
        && !choices
            .iter()
            .any(|choice| value.eq_ignore_ascii_case(choice));

    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }
            select id=(name) name=(name) class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" selected[value.is_empty()] { "Select…" }

                @for choice in choices {
                    option value=(choice) selected[value.eq_ignore_ascii_case(choice)] { (choice) }
                }

                @if is_unlisted {
                    option value=(value) selected { (value) }
                }
            }
        }
    }
}

/// The expense form, pre-filled with `form`.
pub fn expense_form_view(
    mode: &FormMode,
    form: &ExpenseForm,
    hierarchy: &HierarchyFields,
    max_date: Date,
) -> Markup {
    let (title, submit_label, active_endpoint) = match mode {
        FormMode::Create => ("Add Expense", "Save Expense", endpoints::NEW_EXPENSE_VIEW),
        FormMode::Edit { .. } => ("Edit Expense", "Save Changes", endpoints::BILLS_VIEW),
    };
    let update_endpoint = match mode {
        FormMode::Edit { expense_id, .. } => Some(format_endpoint(endpoints::EXPENSE_API, expense_id)),
        FormMode::Create => None,
    };
    let current_bill = match mode {
        FormMode::Edit {
            bill_file: Some(bill_file),
            ..
        } => Some(bill_file.as_str()),
        _ => None,
    };
    let gst_choices = GstRequired::ALL;
    let gst_choices = gst_choices.each_ref().map(GstRequired::as_str);
    let reconciliation_choices = ReconciliationStatus::ALL;
    let reconciliation_choices = reconciliation_choices
        .each_ref()
        .map(ReconciliationStatus::as_str);
    let nav_bar = NavBar::new(active_endpoint).into_html();
    let spinner = loading_spinner();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            @if hierarchy.failed {
                div class="w-full max-w-3xl" { (lookup_failed_alert().into_html()) }
            }

            form
                id="expense-form"
                hx-post=[update_endpoint.is_none().then_some(endpoints::EXPENSES_API)]
                hx-put=[update_endpoint.as_deref()]
                enctype="multipart/form-data"
                hx-target-error="#alert-container"
                class="w-full max-w-3xl space-y-6"
            {
                h2 class="text-xl font-bold" { (title) }

                div class=(CARD_STYLE)
                {
                    div class="space-y-4"
                    {
                        div
                        {
                            label for="expenseDate" class=(FORM_LABEL_STYLE) { "Expense Date" }
                            input
                                type="date"
                                id="expenseDate"
                                name="expenseDate"
                                value=(form.expense_date)
                                max=(max_date)
                                required
                                class=(FORM_TEXT_INPUT_STYLE);
                        }

                        (hierarchy_fieldset(hierarchy))
                    }
                }

                div class=(CARD_STYLE)
                {
                    div class="space-y-4"
                    {
                        h3 class="text-lg font-semibold" { "Bill Details" }

                        (text_input("invoiceNumber", "Invoice Number", &form.invoice_number))
                        (text_input("vendor", "Vendor", &form.vendor))
                        (text_area("description", "Description", &form.description))
                        (choice_select("gstRequired", "GST Input Required", &gst_choices, &form.gst_required))

                        div
                        {
                            label for=(BILL_FILE_FIELD) class=(FORM_LABEL_STYLE) { "Bill File" }
                            input
                                type="file"
                                id=(BILL_FILE_FIELD)
                                name=(BILL_FILE_FIELD)
                                accept=".pdf,.jpg,.jpeg,.png"
                                class=(FORM_TEXT_INPUT_STYLE);

                            @if let Some(bill_file) = current_bill {
                                p class="mt-1 text-sm"
                                {
                                    "Current bill: "
                                    a
                                        href=(bill_file_url(bill_file))
                                        target="_blank"
                                        class=(LINK_STYLE)
                                    {
                                        (bill_file)
                                    }
                                }
                            }
                        }

                        (number_input("amount", "Amount (₹)", &form.amount, true))

                        div class="grid grid-cols-2 gap-4"
                        {
                            (number_input("taxPercent", "Tax Percent (%)", &form.tax_percent, false))
                            (number_input("taxAmount", "Tax Amount", &form.tax_amount, false))
                            (number_input("totalAmount", "Total Amount", &form.total_amount, false))
                            (number_input("quantity", "Quantity", &form.quantity, false))
                        }

                        (text_input("paymentMethod", "Payment Method", &form.payment_method))
                        (choice_select(
                            "reconciliationStatus",
                            "Reconciliation Status",
                            &reconciliation_choices,
                            &form.reconciliation_status,
                        ))
                        (text_area("remarks", "Remarks", &form.remarks))
                    }
                }

                button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="inline htmx-indicator" { (spinner) }
                    " " (submit_label)
                }
            }
        }
    };

    base(title, &[], &content)
}
