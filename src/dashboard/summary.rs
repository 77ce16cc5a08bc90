//! The pre-aggregated dashboard summary and the filters it is requested with.

use serde::Deserialize;
use time::{Date, Month};

use crate::{
    api::wire::{format_date, parse_date},
    hierarchy::{DASHBOARD_FILTER, EntityId, Level, parse_id},
};

/// Totals and breakdowns computed by the expense API for a set of filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSummary {
    pub total_expense: f64,
    pub total_gst: f64,
    /// Spend per person name.
    pub expense_by_person: Vec<(String, f64)>,
    /// Spend per subcategory name.
    pub expense_by_subcategory: Vec<(String, f64)>,
    /// Spend per month, keyed "YYYY-MM" in chronological order.
    pub monthly_expense: Vec<(String, f64)>,
}

impl DashboardSummary {
    /// Whether there is nothing to chart.
    pub fn is_empty(&self) -> bool {
        self.expense_by_person.is_empty()
            && self.expense_by_subcategory.is_empty()
            && self.monthly_expense.is_empty()
    }

    /// The number of persons with a non-zero spend.
    pub fn person_count(&self) -> usize {
        self.expense_by_person
            .iter()
            .filter(|(_, amount)| *amount != 0.0)
            .count()
    }
}

/// The filters sent to the dashboard summary endpoint of the expense API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryFilter {
    pub project_id: Option<EntityId>,
    pub group_id: Option<EntityId>,
    pub category_id: Option<EntityId>,
    pub start: Option<Date>,
    pub end: Option<Date>,
}

impl SummaryFilter {
    /// The filters that are set, as query pairs named the way the expense API
    /// and the dashboard page both read them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let ids = [
            ("projectId", self.project_id),
            ("groupId", self.group_id),
            ("categoryId", self.category_id),
        ];
        let dates = [("start", self.start), ("end", self.end)];

        ids.into_iter()
            .filter_map(|(name, id)| id.map(|id| (name, id.to_string())))
            .chain(
                dates
                    .into_iter()
                    .filter_map(|(name, date)| date.map(|date| (name, format_date(date)))),
            )
            .collect()
    }
}

/// The dashboard filter bar as sent by the browser.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub group_id: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    /// The field name of the select that triggered the request, if any.
    #[serde(default)]
    pub changed: String,
}

impl DashboardQuery {
    pub fn selected(&self, level: Level) -> Option<EntityId> {
        match level {
            Level::Project => parse_id(&self.project_id),
            Level::Group => parse_id(&self.group_id),
            Level::Category => parse_id(&self.category_id),
            Level::Subcategory => None,
        }
    }

    pub fn submitted(&self) -> Vec<(Level, Option<EntityId>)> {
        DASHBOARD_FILTER
            .levels()
            .map(|level| (level, self.selected(level)))
            .collect()
    }

    pub fn changed_level(&self) -> Option<Level> {
        Level::from_field_name(&self.changed)
    }

    /// The summary filter for this query.
    ///
    /// A level only counts when every level above it is selected too, the same
    /// rule the cascade applies when it is rendered.
    pub fn filter(&self) -> SummaryFilter {
        let project_id = self.selected(Level::Project);
        let group_id = project_id.and(self.selected(Level::Group));
        let category_id = group_id.and(self.selected(Level::Category));

        SummaryFilter {
            project_id,
            group_id,
            category_id,
            start: parse_date(&self.start),
            end: parse_date(&self.end),
        }
    }
}

/// Turn a "YYYY-MM" key into a label such as "Jan 2024".
///
/// Keys in any other shape are returned unchanged.
pub fn format_month_label(key: &str) -> String {
    let parsed = key.split_once('-').and_then(|(year, month)| {
        let year = year.parse::<i32>().ok()?;
        let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
        Some((year, month))
    });

    let Some((year, month)) = parsed else {
        return key.to_owned();
    };

    let name = match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{name} {year}")
}
