//! Filtering, totalling and grouping of the expense list shown on the bills page.
//!
//! Every predicate is optional: an empty id set, a blank search or a missing
//! date bound matches every record. Active predicates are combined with AND
//! and the totals are always summed over exactly the records that pass.

use std::collections::HashSet;

use time::Date;

use crate::{expense::Expense, hierarchy::EntityId};

/// The bucket for expenses without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// The active predicates of the bills filter bar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub projects: HashSet<EntityId>,
    pub persons: HashSet<EntityId>,
    pub categories: HashSet<EntityId>,
    pub subcategories: HashSet<EntityId>,
    /// Case-insensitive text matched against the vendor, description and invoice number.
    pub search: String,
    /// Inclusive lower bound of the expense date.
    pub from: Option<Date>,
    /// Inclusive upper bound of the expense date.
    pub to: Option<Date>,
}

/// The sums of the money columns of a set of expenses.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub amount: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
}

impl Totals {
    /// Sum the money columns of `expenses`, counting missing values as zero.
    pub fn of<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Self {
        expenses
            .into_iter()
            .fold(Totals::default(), |totals, expense| Totals {
                amount: totals.amount + expense.amount.unwrap_or(0.0),
                tax_amount: totals.tax_amount + expense.tax_amount.unwrap_or(0.0),
                total_amount: totals.total_amount + expense.total_amount.unwrap_or(0.0),
            })
    }
}

/// The expenses that passed a [RecordFilter] and their totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredExpenses {
    pub visible: Vec<Expense>,
    pub totals: Totals,
}

/// The expenses of one category, in the order they were listed.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub name: String,
    pub expenses: Vec<Expense>,
}

impl CategoryGroup {
    pub fn totals(&self) -> Totals {
        Totals::of(&self.expenses)
    }
}

fn is_member(ids: &HashSet<EntityId>, id: Option<EntityId>) -> bool {
    ids.is_empty() || id.is_some_and(|id| ids.contains(&id))
}

impl RecordFilter {
    fn matches_search(&self, expense: &Expense) -> bool {
        let query = self.search.trim().to_lowercase();

        if query.is_empty() {
            return true;
        }

        [
            &expense.vendor,
            &expense.description,
            &expense.invoice_number,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
    }

    fn matches_dates(&self, expense: &Expense) -> bool {
        if self.from.is_none() && self.to.is_none() {
            return true;
        }

        let Some(date) = expense.date else {
            return false;
        };

        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Whether `expense` passes every active predicate.
    pub fn matches(&self, expense: &Expense) -> bool {
        is_member(&self.projects, expense.project_id())
            && is_member(&self.persons, expense.person_id())
            && is_member(&self.categories, expense.category_id())
            && is_member(&self.subcategories, expense.subcategory_id())
            && self.matches_search(expense)
            && self.matches_dates(expense)
    }

    /// Select the expenses that pass the filter, keeping their order, and total them.
    pub fn apply(&self, expenses: &[Expense]) -> FilteredExpenses {
        let visible = expenses
            .iter()
            .filter(|expense| self.matches(expense))
            .cloned()
            .collect::<Vec<_>>();
        let totals = Totals::of(&visible);

        FilteredExpenses { visible, totals }
    }
}

/// Partition `expenses` by category name.
///
/// Groups appear in the order their category is first seen and expenses keep
/// their order within a group. Expenses without a category go to [UNCATEGORIZED].
pub fn group_by_category(expenses: &[Expense]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();

    for expense in expenses {
        let name = expense
            .category
            .as_ref()
            .map(|category| category.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNCATEGORIZED);

        match groups.iter_mut().find(|group| group.name == name) {
            Some(group) => group.expenses.push(expense.clone()),
            None => groups.push(CategoryGroup {
                name: name.to_owned(),
                expenses: vec![expense.clone()],
            }),
        }
    }

    groups
}
