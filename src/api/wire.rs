//! Normalises the expense API's JSON into domain types.
//!
//! The API is loose about types: ids and amounts arrive as numbers or strings,
//! optional fields may be missing or `null`, and dates may carry a time part.
//! Everything is read from [serde_json::Value] so one odd record never fails a
//! whole list.

use serde_json::Value;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    dashboard::DashboardSummary,
    expense::{Expense, GstRequired, ReconciliationStatus},
    hierarchy::{Entity, EntityId, EntityKind, Lookup},
};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// The key prefix the API uses for the id and name fields of an entity.
pub(crate) fn entity_prefix(lookup: Lookup) -> &'static str {
    match lookup {
        Lookup::AllProjects => "project",
        Lookup::AllPersons => "person",
        Lookup::GroupsByProject => "group",
        Lookup::CategoriesByGroup | Lookup::CategoriesByProject => "category",
        Lookup::SubcategoriesByCategory => "subcategory",
    }
}

pub(crate) fn kind_prefix(kind: EntityKind) -> &'static str {
    kind.slug()
}

fn as_id(value: &Value) -> Option<EntityId> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    }
}

/// Parse the `YYYY-MM-DD` prefix of `text`, ignoring any time part.
pub(crate) fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();
    let date_part = text.get(..10).unwrap_or(text);

    Date::parse(date_part, DATE_FORMAT).ok()
}

pub(crate) fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_default()
}

/// Read an entity with `{prefix}Id` and `{prefix}Name` keys.
pub(crate) fn entity_from_json(value: &Value, prefix: &str) -> Option<Entity> {
    let id = value.get(format!("{prefix}Id")).and_then(as_id)?;
    let name = value
        .get(format!("{prefix}Name"))
        .map(as_text)
        .unwrap_or_default();

    Some(Entity { id, name })
}

pub(crate) fn entities_from_json(value: &Value, prefix: &str) -> Vec<Entity> {
    let Some(items) = value.as_array() else {
        tracing::warn!("Expected a list of {prefix} entities, got {value}");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let entity = entity_from_json(item, prefix);
            if entity.is_none() {
                tracing::warn!("Skipping {prefix} without an id: {item}");
            }
            entity
        })
        .collect()
}

pub(crate) fn expense_from_json(value: &Value) -> Option<Expense> {
    let id = value
        .get("expenseId")
        .and_then(as_id)
        .or_else(|| value.get("id").and_then(as_id))?;

    let text = |key: &str| value.get(key).map(as_text).unwrap_or_default();
    let number = |key: &str| value.get(key).and_then(as_number);
    let nested = |key: &str| value.get(key).and_then(|entity| entity_from_json(entity, key));

    Some(Expense {
        id,
        date: parse_date(&text("expenseDate")),
        person: nested("person"),
        project: nested("project"),
        group: nested("group"),
        category: nested("category"),
        subcategory: nested("subcategory"),
        invoice_number: text("invoiceNumber"),
        vendor: text("vendor"),
        description: text("description"),
        amount: number("amount"),
        quantity: number("quantity"),
        tax_percent: number("taxPercent"),
        tax_amount: number("taxAmount"),
        total_amount: number("totalAmount"),
        gst_required: GstRequired::parse(&text("gstRequired")),
        payment_method: text("paymentMethod"),
        remarks: text("remarks"),
        reconciliation_status: ReconciliationStatus::parse(&text("reconciliationStatus")),
        bill_file: Some(text("billFile")).filter(|file| !file.trim().is_empty()),
    })
}

pub(crate) fn expenses_from_json(value: &Value) -> Vec<Expense> {
    let Some(items) = value.as_array() else {
        tracing::warn!("Expected a list of expenses, got {value}");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let expense = expense_from_json(item);
            if expense.is_none() {
                tracing::warn!("Skipping expense without an id: {item}");
            }
            expense
        })
        .collect()
}

/// Read a `{label: amount}` object as pairs sorted by label, so "YYYY-MM"
/// month keys come out in chronological order.
fn breakdown(value: Option<&Value>) -> Vec<(String, f64)> {
    let mut pairs: Vec<(String, f64)> = value
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .map(|(label, amount)| (label.clone(), as_number(amount).unwrap_or(0.0)))
                .collect()
        })
        .unwrap_or_default();

    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
}

pub(crate) fn summary_from_json(value: &Value) -> DashboardSummary {
    DashboardSummary {
        total_expense: value.get("totalExpense").and_then(as_number).unwrap_or(0.0),
        total_gst: value.get("totalGST").and_then(as_number).unwrap_or(0.0),
        expense_by_person: breakdown(value.get("expenseByPerson")),
        expense_by_subcategory: breakdown(value.get("expenseBySubcategory")),
        monthly_expense: breakdown(value.get("monthlyExpense")),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use crate::{
        expense::{GstRequired, ReconciliationStatus},
        hierarchy::Entity,
    };

    use super::{entities_from_json, expense_from_json, parse_date, summary_from_json};

    #[test]
    fn reads_entities_with_numeric_or_string_ids() {
        let value = json!([
            {"projectId": 1, "projectName": "Tower A"},
            {"projectId": "2", "projectName": "Tower B"},
            {"projectName": "No id"},
        ]);

        let entities = entities_from_json(&value, "project");

        assert_eq!(
            entities,
            [Entity::new(1, "Tower A"), Entity::new(2, "Tower B")]
        );
    }

    #[test]
    fn reads_full_expense() {
        let value = json!({
            "expenseId": 7,
            "expenseDate": "2024-01-15T00:00:00",
            "person": {"personId": 3, "personName": "Ravi"},
            "project": {"projectId": 1, "projectName": "Tower A"},
            "category": {"categoryId": 100, "categoryName": "Steel"},
            "invoiceNumber": "INV-100",
            "vendor": "Tata Steel",
            "amount": "1500.50",
            "taxAmount": 270,
            "totalAmount": null,
            "gstRequired": " YES ",
            "reconciliationStatus": "Pending",
            "billFile": "inv-100.pdf"
        });

        let expense = expense_from_json(&value).expect("want an expense");

        assert_eq!(expense.id, 7);
        assert_eq!(expense.date, Some(date!(2024 - 01 - 15)));
        assert_eq!(expense.person, Some(Entity::new(3, "Ravi")));
        assert_eq!(expense.group, None);
        assert_eq!(expense.category, Some(Entity::new(100, "Steel")));
        assert_eq!(expense.amount, Some(1500.5));
        assert_eq!(expense.tax_amount, Some(270.0));
        assert_eq!(expense.total_amount, None);
        assert_eq!(expense.gst_required, Some(GstRequired::Yes));
        assert_eq!(
            expense.reconciliation_status,
            Some(ReconciliationStatus::Pending)
        );
        assert_eq!(expense.bill_file.as_deref(), Some("inv-100.pdf"));
        assert_eq!(expense.description, "");
    }

    #[test]
    fn falls_back_to_id_key() {
        let expense = expense_from_json(&json!({"id": 9, "billFile": ""})).unwrap();

        assert_eq!(expense.id, 9);
        assert_eq!(expense.bill_file, None);
        assert_eq!(expense.date, None);
    }

    #[test]
    fn malformed_amounts_are_missing() {
        let expense = expense_from_json(&json!({"id": 1, "amount": "n/a"})).unwrap();

        assert_eq!(expense.amount, None);
    }

    #[test]
    fn parses_date_prefix_only() {
        assert_eq!(parse_date("2024-02-29"), Some(time::macros::date!(2024 - 02 - 29)));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("29/02/2024"), None);
    }

    #[test]
    fn reads_summary_breakdowns() {
        let summary = summary_from_json(&json!({
            "totalExpense": 1200,
            "totalGST": "216",
            "expenseByPerson": {"Ravi": 700, "Asha": 500},
            "monthlyExpense": {"2024-02": 200, "2024-01": 1000}
        }));

        assert_eq!(summary.total_expense, 1200.0);
        assert_eq!(summary.total_gst, 216.0);
        assert_eq!(summary.expense_by_person.len(), 2);
        assert!(summary.expense_by_subcategory.is_empty());
        assert_eq!(
            summary.monthly_expense,
            [("2024-01".to_owned(), 1000.0), ("2024-02".to_owned(), 200.0)]
        );
    }
}
