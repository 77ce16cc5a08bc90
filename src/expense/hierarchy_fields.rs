//! The person and Project → Group → Category → Subcategory selects of the expense form.
//!
//! The selects live in one fieldset that is re-rendered whenever one of them
//! changes or a new entity is added, so the server decides which child lists
//! to show and which selections to clear.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    endpoints::{self, format_endpoint},
    expense::ExpenseState,
    hierarchy::{
        EXPENSE_FORM, Entity, EntityFetcher, EntityId, EntityKind, Level, Lookup, SelectField,
        SelectionController, fetch_candidates, lookup_failed_alert, parse_id, rebuild,
        select_field,
    },
    html::{BUTTON_SECONDARY_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The id of the fieldset that holds the hierarchy selects.
pub const HIERARCHY_FIELDSET_ID: &str = "expense-hierarchy";
const HIERARCHY_FIELDSET_SELECTOR: &str = "#expense-hierarchy";

/// The hierarchy selects and add-entity inputs as sent by the browser.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyForm {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub group_id: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub subcategory_id: String,
    #[serde(default)]
    pub person_id: String,
    /// The field name of the select that triggered the request, if any.
    #[serde(default)]
    pub changed: String,
    #[serde(default, rename = "new_project")]
    pub new_project: String,
    #[serde(default, rename = "new_group")]
    pub new_group: String,
    #[serde(default, rename = "new_category")]
    pub new_category: String,
    #[serde(default, rename = "new_subcategory")]
    pub new_subcategory: String,
    #[serde(default, rename = "new_person")]
    pub new_person: String,
}

impl HierarchyForm {
    pub fn selected(&self, level: Level) -> Option<EntityId> {
        let value = match level {
            Level::Project => &self.project_id,
            Level::Group => &self.group_id,
            Level::Category => &self.category_id,
            Level::Subcategory => &self.subcategory_id,
        };

        parse_id(value)
    }

    pub fn submitted(&self) -> Vec<(Level, Option<EntityId>)> {
        EXPENSE_FORM
            .levels()
            .map(|level| (level, self.selected(level)))
            .collect()
    }

    pub fn changed_level(&self) -> Option<Level> {
        Level::from_field_name(&self.changed)
    }

    pub fn person_id(&self) -> Option<EntityId> {
        parse_id(&self.person_id)
    }

    /// The name typed into the add-entity input for `kind`.
    pub fn new_name(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::Project => &self.new_project,
            EntityKind::Group => &self.new_group,
            EntityKind::Category => &self.new_category,
            EntityKind::Subcategory => &self.new_subcategory,
            EntityKind::Person => &self.new_person,
        }
    }
}

/// The loaded state of the hierarchy fieldset.
#[derive(Debug, Clone)]
pub struct HierarchyFields {
    pub cascade: SelectionController,
    pub persons: Vec<Entity>,
    pub person_id: Option<EntityId>,
    /// Whether any option list could not be fetched.
    pub failed: bool,
}

/// Fetch the option lists for the hierarchy fieldset.
///
/// The person list and the cascade are fetched concurrently.
pub async fn load_hierarchy_fields<F: EntityFetcher>(
    fetcher: &F,
    submitted: &[(Level, Option<EntityId>)],
    changed: Option<Level>,
    person_id: Option<EntityId>,
) -> HierarchyFields {
    let (cascade, (persons, persons_ok)) = tokio::join!(
        rebuild(EXPENSE_FORM, submitted, changed, fetcher),
        fetch_candidates(fetcher, Lookup::AllPersons, None)
    );

    HierarchyFields {
        cascade: cascade.controller,
        persons,
        person_id,
        failed: cascade.failed || !persons_ok,
    }
}

/// Re-render the hierarchy fieldset after one of its selects changed.
pub async fn get_hierarchy_fields(
    State(state): State<ExpenseState>,
    Query(form): Query<HierarchyForm>,
) -> Response {
    let fields = load_hierarchy_fields(
        &state.api,
        &form.submitted(),
        form.changed_level(),
        form.person_id(),
    )
    .await;

    html! {
        (hierarchy_fieldset(&fields))

        @if fields.failed {
            (lookup_failed_alert().into_oob_html())
        }
    }
    .into_response()
}

fn add_entity_control(kind: EntityKind) -> Markup {
    let input_name = format!("new_{}", kind.slug());
    let placeholder = format!("New {}", kind.to_string().to_lowercase());
    let endpoint = format_endpoint(endpoints::HIERARCHY_API, kind.slug());

    html! {
        div class="flex gap-2 mt-2"
        {
            input
                type="text"
                name=(input_name)
                placeholder=(placeholder)
                aria-label=(format!("Name of the new {}", kind.to_string().to_lowercase()))
                class=(FORM_TEXT_INPUT_STYLE);

            button
                type="button"
                hx-post=(endpoint)
                hx-include=(HIERARCHY_FIELDSET_SELECTOR)
                hx-target=(HIERARCHY_FIELDSET_SELECTOR)
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
                class=(BUTTON_SECONDARY_STYLE)
            {
                "Add"
            }
        }
    }
}

fn level_select(cascade: &SelectionController, level: Level) -> Markup {
    let label = level.to_string();
    let placeholder = format!("Select a {}", label.to_lowercase());
    let selected = cascade.selected(level);

    let mut field = SelectField::new(level.field_name(), &label, cascade.candidates(level))
        .selected(selected.as_slice())
        .placeholder(&placeholder)
        .cascade(endpoints::EXPENSE_HIERARCHY, HIERARCHY_FIELDSET_SELECTOR)
        .disabled(!cascade.is_enabled(level));

    if level == Level::Project {
        field = field.required();
    }

    select_field(field)
}

fn kind_of(level: Level) -> EntityKind {
    match level {
        Level::Project => EntityKind::Project,
        Level::Group => EntityKind::Group,
        Level::Category => EntityKind::Category,
        Level::Subcategory => EntityKind::Subcategory,
    }
}

/// The fieldset with the person select and the cascading hierarchy selects,
/// each with an input for adding a new entry.
pub fn hierarchy_fieldset(fields: &HierarchyFields) -> Markup {
    let person_selected = fields.person_id;
    let person_select = select_field(
        SelectField::new("personId", "Person", &fields.persons)
            .selected(person_selected.as_slice())
            .placeholder("Select a person"),
    );

    html! {
        fieldset id=(HIERARCHY_FIELDSET_ID) class="space-y-4"
        {
            legend class="text-lg font-semibold mb-2" { "Project Details" }

            div
            {
                (person_select)
                (add_entity_control(EntityKind::Person))
            }

            @for level in EXPENSE_FORM.levels() {
                div
                {
                    (level_select(&fields.cascade, level))

                    @if fields.cascade.is_enabled(level) {
                        (add_entity_control(kind_of(level)))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::{FromRef, Query, State};
    use scraper::{Html, Selector};

    use crate::{
        expense::ExpenseState,
        hierarchy::{EntityKind, Level, Lookup},
        test_utils::{
            StubFetcher,
            fake_api::{FakeApi, FakeApiData},
            parse_html_fragment,
        },
    };

    use super::{HierarchyForm, get_hierarchy_fields, hierarchy_fieldset, load_hierarchy_fields};

    fn stub() -> StubFetcher {
        StubFetcher::default()
            .with(Lookup::AllProjects, None, &[(1, "Tower A")])
            .with(Lookup::AllPersons, None, &[(3, "Ravi")])
            .with(Lookup::GroupsByProject, Some(1), &[(10, "Civil")])
    }

    fn select_values(html: &Html, name: &str) -> Vec<String> {
        html.select(&Selector::parse(&format!("select[name={name}] option")).unwrap())
            .filter_map(|option| option.value().attr("value"))
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn form_reads_changed_select() {
        let form: HierarchyForm = serde_urlencoded::from_str(
            "projectId=2&groupId=10&categoryId=&changed=projectId&new_group=Civil",
        )
        .unwrap();

        assert_eq!(form.changed_level(), Some(Level::Project));
        assert_eq!(form.selected(Level::Group), Some(10));
        assert_eq!(form.selected(Level::Category), None);
        assert_eq!(form.new_name(EntityKind::Group), "Civil");
    }

    #[tokio::test]
    async fn fieldset_enables_only_levels_with_a_parent() {
        let fields =
            load_hierarchy_fields(&stub(), &[(Level::Project, Some(1))], None, Some(3)).await;

        let html = Html::parse_fragment(&hierarchy_fieldset(&fields).into_string());

        assert_eq!(select_values(&html, "groupId"), ["10"]);
        let category = html
            .select(&Selector::parse("select[name=categoryId]").unwrap())
            .next()
            .unwrap();
        assert!(category.value().attr("disabled").is_some());
        let add_inputs = html
            .select(&Selector::parse("input[type=text]").unwrap())
            .filter_map(|input| input.value().attr("name"))
            .collect::<Vec<_>>();
        assert_eq!(add_inputs, ["new_person", "new_project", "new_group"]);
        let person = html
            .select(&Selector::parse("select[name=personId] option[selected]").unwrap())
            .next()
            .unwrap();
        assert_eq!(person.value().attr("value"), Some("3"));
    }

    #[tokio::test]
    async fn failed_lookup_is_flagged() {
        let fields = load_hierarchy_fields(
            &stub().failing(Lookup::AllPersons),
            &[],
            None,
            None,
        )
        .await;

        assert!(fields.failed);
        assert!(fields.persons.is_empty());
        assert_eq!(fields.cascade.candidates(Level::Project).len(), 1);
    }

    #[tokio::test]
    async fn changing_project_clears_stale_children() {
        let api = FakeApi::spawn(
            FakeApiData::default()
                .projects(&[(1, "Tower A"), (2, "Tower B")])
                .groups(1, &[(10, "Civil")])
                .groups(2, &[(20, "Fitout")]),
        )
        .await;
        let form: HierarchyForm =
            serde_urlencoded::from_str("projectId=2&groupId=10&changed=projectId").unwrap();

        let state = ExpenseState::from_ref(&api.app_state());

        let response = get_hierarchy_fields(State(state), Query(form)).await;

        let html = parse_html_fragment(response).await;
        assert_eq!(select_values(&html, "groupId"), ["20"]);
        assert!(
            html.select(&Selector::parse("select[name=groupId] option[selected]").unwrap())
                .all(|option| option.value().attr("value") == Some(""))
        );
        assert!(
            html.select(&Selector::parse("#alert-container").unwrap())
                .next()
                .is_none()
        );
    }

    #[tokio::test]
    async fn unreachable_api_adds_alert() {
        let state = ExpenseState {
            api: FakeApi::unreachable_client(),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_hierarchy_fields(State(state), Query(HierarchyForm::default())).await;

        let html = parse_html_fragment(response).await;
        assert!(
            html.select(&Selector::parse("#alert-container").unwrap())
                .next()
                .is_some()
        );
        assert!(
            html.select(&Selector::parse("#expense-hierarchy").unwrap())
                .next()
                .is_some()
        );
    }
}
