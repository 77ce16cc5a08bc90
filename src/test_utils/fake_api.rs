//! An in-process stand-in for the remote expense API.
//!
//! The fake is a real HTTP server on a random local port, so tests exercise the
//! reqwest client, the URL layout and the JSON/multipart encoding end to end.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, RawQuery, Request, State},
    http::{StatusCode, Uri, header::CONTENT_TYPE},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde_json::{Map, Value, json};

use crate::{AppState, api::ApiClient, hierarchy::EntityId, pagination::PaginationConfig};

/// The records the fake API starts with.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeApiData {
    projects: Vec<Value>,
    persons: Vec<Value>,
    groups: HashMap<EntityId, Vec<Value>>,
    categories_by_group: HashMap<EntityId, Vec<Value>>,
    categories_by_project: HashMap<EntityId, Vec<Value>>,
    subcategories: HashMap<EntityId, Vec<Value>>,
    expenses: Vec<Value>,
    summary: Value,
    bill_files: HashMap<String, (String, Vec<u8>)>,
    fail_status: Option<StatusCode>,
}

fn entities(prefix: &str, entries: &[(EntityId, &str)]) -> Vec<Value> {
    entries
        .iter()
        .map(|(id, name)| {
            let mut entity = Map::new();
            entity.insert(format!("{prefix}Id"), json!(id));
            entity.insert(format!("{prefix}Name"), json!(name));
            Value::Object(entity)
        })
        .collect()
}

impl FakeApiData {
    pub(crate) fn projects(mut self, entries: &[(EntityId, &str)]) -> Self {
        self.projects = entities("project", entries);
        self
    }

    pub(crate) fn persons(mut self, entries: &[(EntityId, &str)]) -> Self {
        self.persons = entities("person", entries);
        self
    }

    pub(crate) fn groups(mut self, project_id: EntityId, entries: &[(EntityId, &str)]) -> Self {
        self.groups.insert(project_id, entities("group", entries));
        self
    }

    pub(crate) fn categories_by_group(
        mut self,
        group_id: EntityId,
        entries: &[(EntityId, &str)],
    ) -> Self {
        self.categories_by_group
            .insert(group_id, entities("category", entries));
        self
    }

    pub(crate) fn categories_by_project(
        mut self,
        project_id: EntityId,
        entries: &[(EntityId, &str)],
    ) -> Self {
        self.categories_by_project
            .insert(project_id, entities("category", entries));
        self
    }

    pub(crate) fn subcategories(
        mut self,
        category_id: EntityId,
        entries: &[(EntityId, &str)],
    ) -> Self {
        self.subcategories
            .insert(category_id, entities("subcategory", entries));
        self
    }

    pub(crate) fn expense(mut self, expense: Value) -> Self {
        self.expenses.push(expense);
        self
    }

    pub(crate) fn summary(mut self, summary: Value) -> Self {
        self.summary = summary;
        self
    }

    pub(crate) fn bill_file(mut self, name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.bill_files
            .insert(name.to_owned(), (content_type.to_owned(), bytes.to_vec()));
        self
    }

    /// Make every route respond with `status`.
    pub(crate) fn failing_with(mut self, status: StatusCode) -> Self {
        self.fail_status = Some(status);
        self
    }
}

/// A multipart expense submission received by the fake API.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Submission {
    pub method: String,
    pub path: String,
    pub fields: Vec<(String, String)>,
    /// The file name of the uploaded bill, if any.
    pub bill_file: Option<String>,
}

impl Submission {
    pub(crate) fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Default)]
struct FakeApiState {
    data: FakeApiData,
    created: Vec<(String, Value)>,
    deleted: Vec<EntityId>,
    submissions: Vec<Submission>,
    summary_queries: Vec<String>,
    next_id: EntityId,
}

type SharedState = Arc<Mutex<FakeApiState>>;

/// A running fake expense API.
pub(crate) struct FakeApi {
    base_url: String,
    state: SharedState,
}

impl FakeApi {
    /// Start a fake API serving `data` on a random local port.
    pub(crate) async fn spawn(data: FakeApiData) -> Self {
        let state = Arc::new(Mutex::new(FakeApiState {
            data,
            next_id: 500,
            ..Default::default()
        }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind fake API listener");
        let address = listener
            .local_addr()
            .expect("Could not get fake API address");
        let app = router(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Fake API server stopped");
        });

        Self {
            base_url: format!("http://{address}/api"),
            state,
        }
    }

    /// A client for an API that refuses every connection.
    pub(crate) fn unreachable_client() -> ApiClient {
        ApiClient::new("http://127.0.0.1:1/api").expect("Could not create API client")
    }

    pub(crate) fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url).expect("Could not create API client")
    }

    pub(crate) fn app_state(&self) -> AppState {
        AppState::new(self.client(), "Etc/UTC", PaginationConfig::default())
    }

    /// The JSON bodies posted to the add routes, with the path they were posted to.
    pub(crate) fn created(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().created.clone()
    }

    pub(crate) fn deleted(&self) -> Vec<EntityId> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub(crate) fn submissions(&self) -> Vec<Submission> {
        self.state.lock().unwrap().submissions.clone()
    }

    pub(crate) fn summary_queries(&self) -> Vec<String> {
        self.state.lock().unwrap().summary_queries.clone()
    }
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route(
            "/api/projects/all",
            get(|State(state): State<SharedState>| async move {
                Json(state.lock().unwrap().data.projects.clone())
            }),
        )
        .route(
            "/api/persons/all",
            get(|State(state): State<SharedState>| async move {
                Json(state.lock().unwrap().data.persons.clone())
            }),
        )
        .route(
            "/api/groups/byProject/{id}",
            get(
                |State(state): State<SharedState>, Path(id): Path<EntityId>| async move {
                    Json(children(&state.lock().unwrap().data.groups, id))
                },
            ),
        )
        .route(
            "/api/categories/byGroup/{id}",
            get(
                |State(state): State<SharedState>, Path(id): Path<EntityId>| async move {
                    Json(children(&state.lock().unwrap().data.categories_by_group, id))
                },
            ),
        )
        .route(
            "/api/categories/byProject/{id}",
            get(
                |State(state): State<SharedState>, Path(id): Path<EntityId>| async move {
                    Json(children(&state.lock().unwrap().data.categories_by_project, id))
                },
            ),
        )
        .route(
            "/api/subcategories/byCategory/{id}",
            get(
                |State(state): State<SharedState>, Path(id): Path<EntityId>| async move {
                    Json(children(&state.lock().unwrap().data.subcategories, id))
                },
            ),
        )
        .route("/api/projects/add", post(add_entity))
        .route("/api/groups/add", post(add_entity))
        .route("/api/categories/add", post(add_entity))
        .route("/api/subcategories/add", post(add_entity))
        .route("/api/persons/add", post(add_entity))
        .route(
            "/api/expenses/all",
            get(|State(state): State<SharedState>| async move {
                Json(state.lock().unwrap().data.expenses.clone())
            }),
        )
        .route(
            "/api/expenses/add",
            post(
                |State(state): State<SharedState>, uri: Uri, multipart: Multipart| async move {
                    record_submission(&state, "POST", &uri, multipart).await
                },
            ),
        )
        .route(
            "/api/expenses/update/{id}",
            put(
                |State(state): State<SharedState>, uri: Uri, multipart: Multipart| async move {
                    record_submission(&state, "PUT", &uri, multipart).await
                },
            ),
        )
        .route("/api/expenses/delete/{id}", delete(delete_expense))
        .route("/api/expenses/files/{filename}", get(get_bill_file))
        .route("/api/dashboard/summary", get(get_summary))
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            fail_if_configured,
        ))
        .with_state(state)
}

fn children(lists: &HashMap<EntityId, Vec<Value>>, parent_id: EntityId) -> Vec<Value> {
    lists.get(&parent_id).cloned().unwrap_or_default()
}

async fn fail_if_configured(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let fail_status = state.lock().unwrap().data.fail_status;

    match fail_status {
        Some(status) => status.into_response(),
        None => next.run(request).await,
    }
}

async fn add_entity(State(state): State<SharedState>, uri: Uri, Json(body): Json<Value>) -> StatusCode {
    let mut state = state.lock().unwrap();
    state.created.push((uri.path().to_owned(), body.clone()));
    state.next_id += 1;
    let id = state.next_id;
    let name = |key: &str| body[key].as_str().unwrap_or_default().to_owned();
    let parent = |key: &str| body[key].as_i64().unwrap_or_default();

    let data = &mut state.data;
    match uri.path() {
        "/api/projects/add" => data
            .projects
            .push(json!({"projectId": id, "projectName": name("projectName")})),
        "/api/persons/add" => data
            .persons
            .push(json!({"personId": id, "personName": name("personName")})),
        "/api/groups/add" => data
            .groups
            .entry(parent("projectId"))
            .or_default()
            .push(json!({"groupId": id, "groupName": name("groupName")})),
        "/api/categories/add" => data
            .categories_by_group
            .entry(parent("groupId"))
            .or_default()
            .push(json!({"categoryId": id, "categoryName": name("categoryName")})),
        "/api/subcategories/add" => data
            .subcategories
            .entry(parent("categoryId"))
            .or_default()
            .push(json!({"subcategoryId": id, "subcategoryName": name("subcategoryName")})),
        _ => return StatusCode::NOT_FOUND,
    }

    StatusCode::CREATED
}

async fn record_submission(
    state: &SharedState,
    method: &str,
    uri: &Uri,
    mut multipart: Multipart,
) -> StatusCode {
    let mut fields = Vec::new();
    let mut bill_file = None;

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_owned();

        match field.file_name().map(str::to_owned) {
            Some(file_name) => {
                field.bytes().await.unwrap();
                bill_file = Some(file_name);
            }
            None => fields.push((name, field.text().await.unwrap())),
        }
    }

    state.lock().unwrap().submissions.push(Submission {
        method: method.to_owned(),
        path: uri.path().to_owned(),
        fields,
        bill_file,
    });

    StatusCode::OK
}

async fn delete_expense(State(state): State<SharedState>, Path(id): Path<EntityId>) -> StatusCode {
    let mut state = state.lock().unwrap();
    state.deleted.push(id);
    state
        .data
        .expenses
        .retain(|expense| expense["expenseId"].as_i64() != Some(id));

    StatusCode::OK
}

async fn get_bill_file(State(state): State<SharedState>, Path(filename): Path<String>) -> Response {
    let state = state.lock().unwrap();

    match state.data.bill_files.get(&filename) {
        Some((content_type, bytes)) => {
            ([(CONTENT_TYPE, content_type.clone())], bytes.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_summary(State(state): State<SharedState>, RawQuery(query): RawQuery) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.summary_queries.push(query.unwrap_or_default());

    Json(state.data.summary.clone())
}
