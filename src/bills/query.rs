//! The bills filter bar as it travels in query strings.

use serde::Deserialize;
use time::Date;

use crate::{
    api::wire::{format_date, parse_date},
    bills::filter::RecordFilter,
    endpoints,
    hierarchy::{EntityId, Level, parse_id},
};

/// The query parameters of the bills page, its content fragment and the CSV export.
///
/// The id lists come from multi-selects, so each may appear any number of times.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BillsQuery {
    #[serde(default)]
    pub project: Vec<String>,
    #[serde(default)]
    pub person: Vec<String>,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub subcategory: Vec<String>,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    pub page: Option<u64>,
    /// The name of the select that triggered the request, if any.
    #[serde(default)]
    pub changed: String,
    /// The category group to export, when exporting one table of a grouped view.
    pub group: Option<String>,
}

/// The field name a bills multi-select submits its values under.
pub fn field_name(level: Level) -> &'static str {
    match level {
        Level::Project => "project",
        Level::Group => "group",
        Level::Category => "category",
        Level::Subcategory => "subcategory",
    }
}

fn parse_ids(values: &[String]) -> Vec<EntityId> {
    let mut ids: Vec<EntityId> = Vec::new();

    for id in values.iter().filter_map(|value| parse_id(value)) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    ids
}

fn single(ids: &[EntityId]) -> Option<EntityId> {
    match ids {
        [id] => Some(*id),
        _ => None,
    }
}

/// The bills filters after the cascade rules have been applied.
///
/// Categories can only be chosen when exactly one project is selected, since
/// the category list is fetched for a single project. The same goes for
/// subcategories and categories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillSelection {
    pub projects: Vec<EntityId>,
    pub persons: Vec<EntityId>,
    pub categories: Vec<EntityId>,
    pub subcategories: Vec<EntityId>,
    pub search: String,
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl BillsQuery {
    pub fn selection(&self) -> BillSelection {
        let changed = match self.changed.as_str() {
            "project" => Some(Level::Project),
            "category" => Some(Level::Category),
            _ => None,
        };

        let projects = parse_ids(&self.project);
        let mut categories = parse_ids(&self.category);
        let mut subcategories = parse_ids(&self.subcategory);

        if changed == Some(Level::Project) || single(&projects).is_none() {
            categories.clear();
        }

        if changed.is_some() || single(&categories).is_none() {
            subcategories.clear();
        }

        BillSelection {
            projects,
            persons: parse_ids(&self.person),
            categories,
            subcategories,
            search: self.search.trim().to_owned(),
            from: parse_date(&self.from),
            to: parse_date(&self.to),
        }
    }
}

impl BillSelection {
    pub fn filter(&self) -> RecordFilter {
        RecordFilter {
            projects: self.projects.iter().copied().collect(),
            persons: self.persons.iter().copied().collect(),
            categories: self.categories.iter().copied().collect(),
            subcategories: self.subcategories.iter().copied().collect(),
            search: self.search.clone(),
            from: self.from,
            to: self.to,
        }
    }

    /// The selections that drive the project, category and subcategory lists.
    pub fn cascade(&self) -> [(Level, Option<EntityId>); 2] {
        [
            (Level::Project, single(&self.projects)),
            (Level::Category, single(&self.categories)),
        ]
    }

    /// Whether the expenses are shown as one table per category.
    pub fn is_grouped(&self) -> bool {
        !self.projects.is_empty()
    }

    /// Whether no filter is active.
    pub fn is_empty(&self) -> bool {
        *self == BillSelection::default()
    }

    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        let id_lists = [
            ("project", &self.projects),
            ("person", &self.persons),
            ("category", &self.categories),
            ("subcategory", &self.subcategories),
        ];
        for (name, ids) in id_lists {
            pairs.extend(ids.iter().map(|id| (name, id.to_string())));
        }

        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if let Some(from) = self.from {
            pairs.push(("from", format_date(from)));
        }
        if let Some(to) = self.to {
            pairs.push(("to", format_date(to)));
        }

        pairs
    }

    /// Encode the selection, and optionally a page number, as a query string.
    pub fn to_query_string(&self, page: Option<u64>) -> String {
        let mut pairs = self.pairs();

        if let Some(page) = page {
            pairs.push(("page", page.to_string()));
        }

        serde_urlencoded::to_string(&pairs).unwrap_or_default()
    }

    /// `route` with the selection as its query string.
    pub fn to_url(&self, route: &str, page: Option<u64>) -> String {
        with_query(route, &self.to_query_string(page))
    }

    /// The CSV export link for the selection, limited to one category group if given.
    pub fn export_url(&self, group: Option<&str>) -> String {
        let mut pairs = self.pairs();

        if let Some(group) = group {
            pairs.push(("group", group.to_owned()));
        }

        let query = serde_urlencoded::to_string(&pairs).unwrap_or_default();

        with_query(endpoints::BILLS_EXPORT, &query)
    }
}

fn with_query(route: &str, query: &str) -> String {
    if query.is_empty() {
        route.to_owned()
    } else {
        format!("{route}?{query}")
    }
}
