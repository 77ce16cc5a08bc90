//! The Project → Group → Category → Subcategory hierarchy that expenses are filed under.
//!
//! Entities only carry an id and a name. Which parent an entity belongs to is a
//! property of the lookup used to fetch it, so the same category can be reached
//! through its group on the expense form and through its project on the bills page.

mod create;
mod fetcher;
mod selection;
mod view;

use std::fmt::Display;

use crate::alert::Alert;

pub use create::create_entity_endpoint;
pub use fetcher::{EntityFetcher, fetch_candidates, prepopulate, rebuild};
pub use selection::SelectionController;
pub use view::{SelectField, select_field};

/// The identifier the expense API assigns to projects, groups, categories,
/// subcategories, persons and expenses.
pub type EntityId = i64;

/// A lookup entity normalised to an id and a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
}

impl Entity {
    pub fn new(id: EntityId, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
        }
    }
}

/// A level of the expense hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Project,
    Group,
    Category,
    Subcategory,
}

impl Level {
    /// The form field that carries the selected id for this level.
    pub fn field_name(self) -> &'static str {
        match self {
            Level::Project => "projectId",
            Level::Group => "groupId",
            Level::Category => "categoryId",
            Level::Subcategory => "subcategoryId",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        [
            Level::Project,
            Level::Group,
            Level::Category,
            Level::Subcategory,
        ]
        .into_iter()
        .find(|level| level.field_name() == name)
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Level::Project => "Project",
            Level::Group => "Group",
            Level::Category => "Category",
            Level::Subcategory => "Subcategory",
        };

        write!(f, "{name}")
    }
}

/// A list of entities the expense API can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    AllProjects,
    AllPersons,
    GroupsByProject,
    CategoriesByGroup,
    CategoriesByProject,
    SubcategoriesByCategory,
}

/// A level of a cascade and the lookup that lists its candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub level: Level,
    pub lookup: Lookup,
}

/// An ordered chain of levels where each level's candidates depend on the
/// selection one level up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadePath {
    steps: &'static [PathStep],
}

impl CascadePath {
    pub fn steps(&self) -> &'static [PathStep] {
        self.steps
    }

    pub fn levels(&self) -> impl Iterator<Item = Level> {
        self.steps.iter().map(|step| step.level)
    }
}

/// The cascade of the expense form: groups by project, categories by group and
/// subcategories by category.
pub const EXPENSE_FORM: CascadePath = CascadePath {
    steps: &[
        PathStep {
            level: Level::Project,
            lookup: Lookup::AllProjects,
        },
        PathStep {
            level: Level::Group,
            lookup: Lookup::GroupsByProject,
        },
        PathStep {
            level: Level::Category,
            lookup: Lookup::CategoriesByGroup,
        },
        PathStep {
            level: Level::Subcategory,
            lookup: Lookup::SubcategoriesByCategory,
        },
    ],
};

/// The cascade of the dashboard filter bar.
pub const DASHBOARD_FILTER: CascadePath = CascadePath {
    steps: &[
        PathStep {
            level: Level::Project,
            lookup: Lookup::AllProjects,
        },
        PathStep {
            level: Level::Group,
            lookup: Lookup::GroupsByProject,
        },
        PathStep {
            level: Level::Category,
            lookup: Lookup::CategoriesByGroup,
        },
    ],
};

/// The cascade of the bills filter bar, which skips groups and lists
/// categories by project.
pub const BILL_FILTER: CascadePath = CascadePath {
    steps: &[
        PathStep {
            level: Level::Project,
            lookup: Lookup::AllProjects,
        },
        PathStep {
            level: Level::Category,
            lookup: Lookup::CategoriesByProject,
        },
        PathStep {
            level: Level::Subcategory,
            lookup: Lookup::SubcategoriesByCategory,
        },
    ],
};

/// The kinds of entity that can be added from the expense form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Project,
    Group,
    Category,
    Subcategory,
    Person,
}

impl EntityKind {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "project" => Some(EntityKind::Project),
            "group" => Some(EntityKind::Group),
            "category" => Some(EntityKind::Category),
            "subcategory" => Some(EntityKind::Subcategory),
            "person" => Some(EntityKind::Person),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            EntityKind::Project => "project",
            EntityKind::Group => "group",
            EntityKind::Category => "category",
            EntityKind::Subcategory => "subcategory",
            EntityKind::Person => "person",
        }
    }

    /// The level that must be selected before an entity of this kind can be added.
    pub fn parent_level(self) -> Option<Level> {
        match self {
            EntityKind::Group => Some(Level::Project),
            EntityKind::Category => Some(Level::Group),
            EntityKind::Subcategory => Some(Level::Category),
            EntityKind::Project | EntityKind::Person => None,
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Project => write!(f, "{}", Level::Project),
            EntityKind::Group => write!(f, "{}", Level::Group),
            EntityKind::Category => write!(f, "{}", Level::Category),
            EntityKind::Subcategory => write!(f, "{}", Level::Subcategory),
            EntityKind::Person => write!(f, "Person"),
        }
    }
}

/// The alert shown when a list of options could not be fetched.
pub fn lookup_failed_alert() -> Alert {
    Alert::ErrorSimple {
        message: "Could not load some of the options. Try again in a moment.".to_owned(),
    }
}

/// Parse an id from a form or query value, treating blank and malformed values as unset.
pub fn parse_id(value: &str) -> Option<EntityId> {
    value.trim().parse().ok()
}
