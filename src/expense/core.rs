//! The expense record as read from the expense API.

use std::fmt::Display;

use time::Date;

use crate::hierarchy::{Entity, EntityId};

/// The id the expense API assigns to an expense.
pub type ExpenseId = EntityId;

/// Whether GST input credit applies to an expense.
///
/// Values outside the known choices are kept as [GstRequired::Other] so they
/// are shown and saved back as the API sent them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GstRequired {
    Yes,
    No,
    Partially,
    Other(String),
}

impl GstRequired {
    /// The choices offered on the expense form.
    pub const ALL: [GstRequired; 3] = [GstRequired::Yes, GstRequired::No, GstRequired::Partially];

    /// Parse `text` ignoring case and surrounding whitespace.
    ///
    /// Blank text is `None`, unknown text is [GstRequired::Other].
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let known = Self::ALL
            .into_iter()
            .find(|value| value.as_str().eq_ignore_ascii_case(text));

        Some(known.unwrap_or_else(|| GstRequired::Other(text.to_owned())))
    }

    pub fn as_str(&self) -> &str {
        match self {
            GstRequired::Yes => "Yes",
            GstRequired::No => "No",
            GstRequired::Partially => "Partially",
            GstRequired::Other(text) => text,
        }
    }
}

impl Display for GstRequired {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How far an expense has been matched against the bank statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationStatus {
    Pending,
    Reconciled,
    Discrepancy,
    Other(String),
}

impl ReconciliationStatus {
    pub const ALL: [ReconciliationStatus; 3] = [
        ReconciliationStatus::Pending,
        ReconciliationStatus::Reconciled,
        ReconciliationStatus::Discrepancy,
    ];

    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let known = Self::ALL
            .into_iter()
            .find(|value| value.as_str().eq_ignore_ascii_case(text));

        Some(known.unwrap_or_else(|| ReconciliationStatus::Other(text.to_owned())))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReconciliationStatus::Pending => "Pending",
            ReconciliationStatus::Reconciled => "Reconciled",
            ReconciliationStatus::Discrepancy => "Discrepancy",
            ReconciliationStatus::Other(text) => text,
        }
    }
}

impl Display for ReconciliationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded expense.
///
/// Text fields the API leaves out are empty strings, numbers it leaves out or
/// that cannot be read are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub date: Option<Date>,
    pub person: Option<Entity>,
    pub project: Option<Entity>,
    pub group: Option<Entity>,
    pub category: Option<Entity>,
    pub subcategory: Option<Entity>,
    pub invoice_number: String,
    pub vendor: String,
    pub description: String,
    pub amount: Option<f64>,
    pub quantity: Option<f64>,
    pub tax_percent: Option<f64>,
    pub tax_amount: Option<f64>,
    pub total_amount: Option<f64>,
    pub gst_required: Option<GstRequired>,
    pub payment_method: String,
    pub remarks: String,
    pub reconciliation_status: Option<ReconciliationStatus>,
    /// The name the bill file is stored under, if one was uploaded.
    pub bill_file: Option<String>,
}

impl Expense {
    /// An expense with only an id, for building test data.
    #[cfg(test)]
    pub(crate) fn build(id: ExpenseId) -> Self {
        Self {
            id,
            date: None,
            person: None,
            project: None,
            group: None,
            category: None,
            subcategory: None,
            invoice_number: String::new(),
            vendor: String::new(),
            description: String::new(),
            amount: None,
            quantity: None,
            tax_percent: None,
            tax_amount: None,
            total_amount: None,
            gst_required: None,
            payment_method: String::new(),
            remarks: String::new(),
            reconciliation_status: None,
            bill_file: None,
        }
    }

    fn entity_id(entity: &Option<Entity>) -> Option<EntityId> {
        entity.as_ref().map(|entity| entity.id)
    }

    pub fn project_id(&self) -> Option<EntityId> {
        Self::entity_id(&self.project)
    }

    pub fn person_id(&self) -> Option<EntityId> {
        Self::entity_id(&self.person)
    }

    pub fn group_id(&self) -> Option<EntityId> {
        Self::entity_id(&self.group)
    }

    pub fn category_id(&self) -> Option<EntityId> {
        Self::entity_id(&self.category)
    }

    pub fn subcategory_id(&self) -> Option<EntityId> {
        Self::entity_id(&self.subcategory)
    }
}

#[cfg(test)]
mod tests {
    use super::{GstRequired, ReconciliationStatus};

    #[test]
    fn gst_is_parsed_in_any_case() {
        assert_eq!(GstRequired::parse("yes"), Some(GstRequired::Yes));
        assert_eq!(GstRequired::parse("NO"), Some(GstRequired::No));
        assert_eq!(GstRequired::parse(" partially "), Some(GstRequired::Partially));
        assert_eq!(GstRequired::parse("  "), None);
    }

    #[test]
    fn unknown_gst_keeps_its_text() {
        let gst = GstRequired::parse(" Exempt ");

        assert_eq!(gst, Some(GstRequired::Other("Exempt".to_owned())));
        assert_eq!(gst.unwrap().as_str(), "Exempt");
    }

    #[test]
    fn reconciliation_status_is_parsed_in_any_case() {
        assert_eq!(
            ReconciliationStatus::parse("reconciled"),
            Some(ReconciliationStatus::Reconciled)
        );
        assert_eq!(
            ReconciliationStatus::parse("On hold"),
            Some(ReconciliationStatus::Other("On hold".to_owned()))
        );
        assert_eq!(ReconciliationStatus::parse(""), None);
        assert_eq!(ReconciliationStatus::Discrepancy.to_string(), "Discrepancy");
    }
}
