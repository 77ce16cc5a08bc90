//! Defines the endpoint for adding a project, group, category, subcategory or person.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::html;

use crate::{
    Error,
    alert::Alert,
    expense::{ExpenseState, HierarchyForm, hierarchy_fieldset, load_hierarchy_fields},
    hierarchy::{EntityId, EntityKind},
};

/// Check a new entity request before anything is sent to the expense API.
fn validate(kind: &str, form: &HierarchyForm) -> Result<(EntityKind, String, Option<EntityId>), Error> {
    let kind = EntityKind::from_slug(kind).ok_or_else(|| Error::InvalidEntityKind(kind.to_owned()))?;

    let name = form.new_name(kind).trim();
    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    let parent_id = match kind.parent_level() {
        Some(parent_level) => Some(
            form.selected(parent_level)
                .ok_or(Error::MissingParent(parent_level))?,
        ),
        None => None,
    };

    Ok((kind, name.to_owned(), parent_id))
}

/// A route handler for adding a new entity from the expense form.
///
/// Responds with the re-rendered hierarchy fieldset, so the list the entity was
/// added to is fetched again, and a success alert.
pub async fn create_entity_endpoint(
    State(state): State<ExpenseState>,
    Path(kind): Path<String>,
    Form(form): Form<HierarchyForm>,
) -> Response {
    let (kind, name, parent_id) = match validate(&kind, &form) {
        Ok(valid) => valid,
        Err(error) => {
            tracing::debug!("Rejected new {kind}: {error}");
            return error.into_alert_response();
        }
    };

    if let Err(error) = state.api.create_entity(kind, &name, parent_id).await {
        tracing::error!("Could not add {kind} \"{name}\": {error}");
        return error.into_alert_response();
    }

    tracing::info!("Added {kind} \"{name}\"");

    let fields =
        load_hierarchy_fields(&state.api, &form.submitted(), None, form.person_id()).await;

    html! {
        (hierarchy_fieldset(&fields))
        (Alert::SuccessSimple { message: format!("{kind} added successfully") }.into_oob_html())
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{FromRef, Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use scraper::Selector;
    use serde_json::json;

    use crate::{
        expense::{ExpenseState, HierarchyForm},
        test_utils::{
            fake_api::{FakeApi, FakeApiData},
            parse_html_fragment,
        },
    };

    use super::create_entity_endpoint;

    fn form(query: &str) -> Form<HierarchyForm> {
        Form(serde_urlencoded::from_str(query).unwrap())
    }

    #[tokio::test]
    async fn adds_group_and_refetches_its_list() {
        let api = FakeApi::spawn(FakeApiData::default().projects(&[(1, "Tower A")])).await;
        let state = ExpenseState::from_ref(&api.app_state());

        let response = create_entity_endpoint(
            State(state),
            Path("group".to_owned()),
            form("projectId=1&new_group=%20Civil%20"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            api.created(),
            [(
                "/api/groups/add".to_owned(),
                json!({"groupName": "Civil", "projectId": 1})
            )]
        );
        let html = parse_html_fragment(response).await;
        let groups = html
            .select(&Selector::parse("select[name=groupId] option").unwrap())
            .filter_map(|option| option.value().attr("value"))
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>();
        assert_eq!(groups.len(), 1, "want the new group in the refetched list");
        let alert = html
            .select(&Selector::parse("#alert-container [role=alert]").unwrap())
            .next()
            .expect("want a success alert");
        assert!(alert.text().collect::<String>().contains("Group added successfully"));
    }

    #[tokio::test]
    async fn blank_name_is_rejected_before_any_request() {
        let api = FakeApi::spawn(FakeApiData::default()).await;
        let state = ExpenseState::from_ref(&api.app_state());

        let response =
            create_entity_endpoint(State(state), Path("project".to_owned()), form("new_project=%20"))
                .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert!(html.html().contains("Please enter a name before adding"));
        assert!(api.created().is_empty());
    }

    #[tokio::test]
    async fn child_without_parent_is_rejected_before_any_request() {
        let api = FakeApi::spawn(FakeApiData::default()).await;
        let state = ExpenseState::from_ref(&api.app_state());

        let response = create_entity_endpoint(
            State(state),
            Path("subcategory".to_owned()),
            form("projectId=1&groupId=10&new_subcategory=Rebar"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert!(html.html().contains("Please select a Category first"));
        assert!(api.created().is_empty());
    }

    #[tokio::test]
    async fn unknown_kind_is_rejected() {
        let api = FakeApi::spawn(FakeApiData::default()).await;
        let state = ExpenseState::from_ref(&api.app_state());

        let response =
            create_entity_endpoint(State(state), Path("vendor".to_owned()), form("")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(api.created().is_empty());
    }

    #[tokio::test]
    async fn person_needs_no_parent() {
        let api = FakeApi::spawn(FakeApiData::default()).await;
        let state = ExpenseState::from_ref(&api.app_state());

        let response =
            create_entity_endpoint(State(state), Path("person".to_owned()), form("new_person=Asha"))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            api.created(),
            [("/api/persons/add".to_owned(), json!({"personName": "Asha"}))]
        );
    }
}
