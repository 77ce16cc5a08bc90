//! Reading the expense form the browser submits.

use axum::{
    body::Bytes,
    extract::{Multipart, multipart::Field},
};

use crate::{
    Error,
    api::wire::{format_date, parse_date},
    expense::Expense,
    hierarchy::{EntityId, parse_id},
};

/// A bill file attached to the expense form.
#[derive(Debug, Clone, PartialEq)]
pub struct BillUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// The expense form as submitted, keyed by the expense API's field names.
///
/// Values are kept as the text the user entered and forwarded unchanged, so
/// only the required fields are checked here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseForm {
    pub expense_date: String,
    pub person_id: String,
    pub project_id: String,
    pub group_id: String,
    pub category_id: String,
    pub subcategory_id: String,
    pub invoice_number: String,
    pub vendor: String,
    pub description: String,
    pub amount: String,
    pub gst_required: String,
    pub quantity: String,
    pub tax_percent: String,
    pub tax_amount: String,
    pub total_amount: String,
    pub payment_method: String,
    pub remarks: String,
    pub reconciliation_status: String,
    pub bill_file: Option<BillUpload>,
}

/// The multipart field that carries the bill file.
pub const BILL_FILE_FIELD: &str = "billFile";

impl ExpenseForm {
    /// Read the form from a multipart request.
    ///
    /// Fields the form does not know about, such as the add-entity inputs, are
    /// skipped. An empty file input counts as no bill file.
    ///
    /// # Errors
    /// Returns [Error::MultipartError] if the request body is not valid multipart data.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, Error> {
        let mut form = ExpenseForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .inspect_err(|error| tracing::error!("Could not read multipart field: {error}"))
            .map_err(|error| Error::MultipartError(error.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_owned();

            if name == BILL_FILE_FIELD {
                form.bill_file = read_bill_file(field).await?;
            } else if let Some(value) = form.field_mut(&name) {
                *value = field.text().await.map_err(|error| {
                    tracing::error!("Could not read multipart field {name}: {error}");
                    Error::MultipartError(format!("Could not read the field {name}"))
                })?;
            }
        }

        Ok(form)
    }

    /// Fill the form from an existing expense, for editing.
    pub fn from_expense(expense: &Expense) -> Self {
        let id = |id: Option<EntityId>| id.map(|id| id.to_string()).unwrap_or_default();
        let number = |value: Option<f64>| value.map(|value| value.to_string()).unwrap_or_default();

        Self {
            expense_date: expense.date.map(format_date).unwrap_or_default(),
            person_id: id(expense.person_id()),
            project_id: id(expense.project_id()),
            group_id: id(expense.group_id()),
            category_id: id(expense.category_id()),
            subcategory_id: id(expense.subcategory_id()),
            invoice_number: expense.invoice_number.clone(),
            vendor: expense.vendor.clone(),
            description: expense.description.clone(),
            amount: number(expense.amount),
            gst_required: expense
                .gst_required
                .as_ref()
                .map(|gst| gst.to_string())
                .unwrap_or_default(),
            quantity: number(expense.quantity),
            tax_percent: number(expense.tax_percent),
            tax_amount: number(expense.tax_amount),
            total_amount: number(expense.total_amount),
            payment_method: expense.payment_method.clone(),
            remarks: expense.remarks.clone(),
            reconciliation_status: expense
                .reconciliation_status
                .as_ref()
                .map(|status| status.to_string())
                .unwrap_or_default(),
            bill_file: None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        let value = match name {
            "expenseDate" => &mut self.expense_date,
            "personId" => &mut self.person_id,
            "projectId" => &mut self.project_id,
            "groupId" => &mut self.group_id,
            "categoryId" => &mut self.category_id,
            "subcategoryId" => &mut self.subcategory_id,
            "invoiceNumber" => &mut self.invoice_number,
            "vendor" => &mut self.vendor,
            "description" => &mut self.description,
            "amount" => &mut self.amount,
            "gstRequired" => &mut self.gst_required,
            "quantity" => &mut self.quantity,
            "taxPercent" => &mut self.tax_percent,
            "taxAmount" => &mut self.tax_amount,
            "totalAmount" => &mut self.total_amount,
            "paymentMethod" => &mut self.payment_method,
            "remarks" => &mut self.remarks,
            "reconciliationStatus" => &mut self.reconciliation_status,
            _ => return None,
        };

        Some(value)
    }

    /// The text fields in the order the expense API expects them.
    pub fn text_fields(&self) -> [(&'static str, &str); 18] {
        [
            ("expenseDate", self.expense_date.as_str()),
            ("personId", self.person_id.as_str()),
            ("projectId", self.project_id.as_str()),
            ("groupId", self.group_id.as_str()),
            ("categoryId", self.category_id.as_str()),
            ("subcategoryId", self.subcategory_id.as_str()),
            ("invoiceNumber", self.invoice_number.as_str()),
            ("vendor", self.vendor.as_str()),
            ("description", self.description.as_str()),
            ("amount", self.amount.as_str()),
            ("gstRequired", self.gst_required.as_str()),
            ("quantity", self.quantity.as_str()),
            ("taxPercent", self.tax_percent.as_str()),
            ("taxAmount", self.tax_amount.as_str()),
            ("totalAmount", self.total_amount.as_str()),
            ("paymentMethod", self.payment_method.as_str()),
            ("remarks", self.remarks.as_str()),
            ("reconciliationStatus", self.reconciliation_status.as_str()),
        ]
    }

    /// Check the fields the expense API cannot do without.
    ///
    /// # Errors
    /// Returns [Error::MissingField] naming the first of expense date, project
    /// and amount that is empty.
    pub fn validate(&self) -> Result<(), Error> {
        if parse_date(&self.expense_date).is_none() {
            return Err(Error::MissingField("Expense Date"));
        }

        if parse_id(&self.project_id).is_none() {
            return Err(Error::MissingField("Project"));
        }

        if self.amount.trim().is_empty() {
            return Err(Error::MissingField("Amount"));
        }

        Ok(())
    }
}

async fn read_bill_file(field: Field<'_>) -> Result<Option<BillUpload>, Error> {
    let file_name = field.file_name().unwrap_or_default().to_owned();
    let content_type = field.content_type().map(str::to_owned);
    let bytes = field.bytes().await.map_err(|error| {
        tracing::error!("Could not read bill file {file_name}: {error}");
        Error::MultipartError("Could not read the bill file".to_owned())
    })?;

    if file_name.is_empty() || bytes.is_empty() {
        return Ok(None);
    }

    tracing::debug!("Received bill file '{file_name}' that is {} bytes", bytes.len());

    Ok(Some(BillUpload {
        file_name,
        content_type,
        bytes,
    }))
}
