//! The HTTP client for the remote expense API.

use axum::body::Bytes;
use reqwest::{
    Client, Url,
    multipart::{Form, Part},
};
use serde_json::{Map, Value, json};

use crate::{
    Error,
    api::wire::{
        entities_from_json, entity_prefix, expenses_from_json, kind_prefix, summary_from_json,
    },
    dashboard::{DashboardSummary, SummaryFilter},
    expense::{Expense, ExpenseForm, ExpenseId},
    hierarchy::{Entity, EntityFetcher, EntityId, EntityKind, Level, Lookup},
};

/// A bill file downloaded from the expense API.
#[derive(Debug, Clone)]
pub struct BillFile {
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// A client for the expense API rooted at a base URL, e.g. `https://example.com/api`.
///
/// Cloning is cheap, clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the API at `base_url`.
    ///
    /// # Errors
    /// Returns [Error::ApiRequest] if `base_url` is not a valid absolute URL.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)
            .map_err(|error| Error::ApiRequest(format!("invalid API URL {base_url}: {error}")))?;

        // Without a trailing slash, joining replaces the last path segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    /// The URL every API path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path)
            .map_err(|error| Error::ApiRequest(format!("invalid API path {path}: {error}")))
    }

    async fn get_json(&self, url: Url) -> Result<Value, Error> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .inspect_err(|error| tracing::error!("GET {url} failed: {error}"))?
            .error_for_status()
            .inspect_err(|error| tracing::error!("GET {url} returned an error: {error}"))?;

        Ok(response.json().await?)
    }

    fn lookup_path(lookup: Lookup, parent_id: Option<EntityId>) -> Result<String, Error> {
        let parent = |parent_level| parent_id.ok_or(Error::MissingParent(parent_level));

        let path = match lookup {
            Lookup::AllProjects => "projects/all".to_owned(),
            Lookup::AllPersons => "persons/all".to_owned(),
            Lookup::GroupsByProject => format!("groups/byProject/{}", parent(Level::Project)?),
            Lookup::CategoriesByGroup => format!("categories/byGroup/{}", parent(Level::Group)?),
            Lookup::CategoriesByProject => {
                format!("categories/byProject/{}", parent(Level::Project)?)
            }
            Lookup::SubcategoriesByCategory => {
                format!("subcategories/byCategory/{}", parent(Level::Category)?)
            }
        };

        Ok(path)
    }

    /// Fetch the entities listed by `lookup`.
    pub async fn lookup(
        &self,
        lookup: Lookup,
        parent_id: Option<EntityId>,
    ) -> Result<Vec<Entity>, Error> {
        let url = self.url(&Self::lookup_path(lookup, parent_id)?)?;
        let body = self.get_json(url).await?;

        Ok(entities_from_json(&body, entity_prefix(lookup)))
    }

    /// Add a project, group, category, subcategory or person called `name`.
    ///
    /// `parent_id` is the id of the project, group or category the new entity
    /// belongs to and is ignored for projects and persons.
    pub async fn create_entity(
        &self,
        kind: EntityKind,
        name: &str,
        parent_id: Option<EntityId>,
    ) -> Result<(), Error> {
        let mut body = Map::new();
        body.insert(format!("{}Name", kind_prefix(kind)), json!(name));

        if let Some(parent_level) = kind.parent_level() {
            let parent_id = parent_id.ok_or(Error::MissingParent(parent_level))?;
            body.insert(parent_level.field_name().to_owned(), json!(parent_id));
        }

        let body = Value::Object(body);

        let url = self.url(&format!("{}s/add", plural_stem(kind)))?;

        self.client
            .post(url.clone())
            .json(&body)
            .send()
            .await
            .inspect_err(|error| tracing::error!("POST {url} failed: {error}"))?
            .error_for_status()
            .inspect_err(|error| tracing::error!("POST {url} returned an error: {error}"))?;

        Ok(())
    }

    /// Fetch every expense.
    pub async fn expenses(&self) -> Result<Vec<Expense>, Error> {
        let url = self.url("expenses/all")?;
        let body = self.get_json(url).await?;

        Ok(expenses_from_json(&body))
    }

    /// Find a single expense. The API has no endpoint for this, so the full list is searched.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no expense has the id `expense_id`.
    pub async fn expense(&self, expense_id: ExpenseId) -> Result<Expense, Error> {
        self.expenses()
            .await?
            .into_iter()
            .find(|expense| expense.id == expense_id)
            .ok_or(Error::NotFound)
    }

    fn multipart(form: ExpenseForm) -> Result<Form, Error> {
        let mut multipart = Form::new();

        for (name, value) in form.text_fields() {
            multipart = multipart.text(name, value.to_owned());
        }

        if let Some(bill) = form.bill_file {
            let mut part = Part::bytes(bill.bytes.to_vec()).file_name(bill.file_name);

            if let Some(content_type) = bill.content_type {
                part = part.mime_str(&content_type)?;
            }

            multipart = multipart.part("billFile", part);
        }

        Ok(multipart)
    }

    /// Record a new expense with its optional bill file.
    pub async fn create_expense(&self, form: ExpenseForm) -> Result<(), Error> {
        let url = self.url("expenses/add")?;

        self.client
            .post(url.clone())
            .multipart(Self::multipart(form)?)
            .send()
            .await
            .inspect_err(|error| tracing::error!("POST {url} failed: {error}"))?
            .error_for_status()
            .inspect_err(|error| tracing::error!("POST {url} returned an error: {error}"))?;

        Ok(())
    }

    /// Replace the expense `expense_id` with `form`.
    pub async fn update_expense(&self, expense_id: ExpenseId, form: ExpenseForm) -> Result<(), Error> {
        let url = self.url(&format!("expenses/update/{expense_id}"))?;

        self.client
            .put(url.clone())
            .multipart(Self::multipart(form)?)
            .send()
            .await
            .inspect_err(|error| tracing::error!("PUT {url} failed: {error}"))?
            .error_for_status()
            .inspect_err(|error| tracing::error!("PUT {url} returned an error: {error}"))?;

        Ok(())
    }

    /// Delete the expense `expense_id` and its bill file.
    pub async fn delete_expense(&self, expense_id: ExpenseId) -> Result<(), Error> {
        let url = self.url(&format!("expenses/delete/{expense_id}"))?;

        self.client
            .delete(url.clone())
            .send()
            .await
            .inspect_err(|error| tracing::error!("DELETE {url} failed: {error}"))?
            .error_for_status()
            .inspect_err(|error| tracing::error!("DELETE {url} returned an error: {error}"))?;

        Ok(())
    }

    /// Fetch the pre-aggregated totals for the dashboard.
    pub async fn dashboard_summary(&self, filter: &SummaryFilter) -> Result<DashboardSummary, Error> {
        let mut url = self.url("dashboard/summary")?;

        let pairs = filter.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        let body = self.get_json(url).await?;

        Ok(summary_from_json(&body))
    }

    /// Download the bill file stored under `filename`.
    pub async fn bill_file(&self, filename: &str) -> Result<BillFile, Error> {
        let mut url = self.url("expenses/files/")?;
        let base = url.to_string();
        url.path_segments_mut()
            .map_err(|_| Error::ApiRequest(format!("cannot add {filename} to {base}")))?
            .pop_if_empty()
            .push(filename);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .inspect_err(|error| tracing::error!("GET {url} failed: {error}"))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound);
        }

        let response = response
            .error_for_status()
            .inspect_err(|error| tracing::error!("GET {url} returned an error: {error}"))?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?;

        Ok(BillFile {
            content_type,
            bytes,
        })
    }
}

/// The collection name the API uses in add routes, e.g. "categorie" + "s".
fn plural_stem(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Project => "project",
        EntityKind::Group => "group",
        EntityKind::Category => "categorie",
        EntityKind::Subcategory => "subcategorie",
        EntityKind::Person => "person",
    }
}

impl EntityFetcher for ApiClient {
    async fn fetch(
        &self,
        lookup: Lookup,
        parent_id: Option<EntityId>,
    ) -> Result<Vec<Entity>, Error> {
        self.lookup(lookup, parent_id).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        Error,
        dashboard::SummaryFilter,
        hierarchy::{Entity, EntityKind, Level, Lookup},
        test_utils::fake_api::{FakeApi, FakeApiData},
    };

    use super::ApiClient;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = ApiClient::new("https://example.com/api").unwrap();

        assert_eq!(client.base_url().as_str(), "https://example.com/api/");
    }

    #[test]
    fn invalid_base_url_is_an_error() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(Error::ApiRequest(_))
        ));
    }

    #[tokio::test]
    async fn lookups_hit_parent_routes() {
        let api = FakeApi::spawn(
            FakeApiData::default()
                .groups(1, &[(10, "Civil")])
                .categories_by_project(1, &[(100, "Steel")]),
        )
        .await;

        let groups = api
            .client()
            .lookup(Lookup::GroupsByProject, Some(1))
            .await
            .unwrap();
        let categories = api
            .client()
            .lookup(Lookup::CategoriesByProject, Some(1))
            .await
            .unwrap();

        assert_eq!(groups, [Entity::new(10, "Civil")]);
        assert_eq!(categories, [Entity::new(100, "Steel")]);
    }

    #[tokio::test]
    async fn lookup_without_parent_is_an_error() {
        let client = ApiClient::new("http://127.0.0.1:9/api").unwrap();

        let result = client.lookup(Lookup::SubcategoriesByCategory, None).await;

        assert_eq!(result, Err(Error::MissingParent(Level::Category)));
    }

    #[tokio::test]
    async fn create_entity_sends_name_and_parent() {
        let api = FakeApi::spawn(FakeApiData::default()).await;

        api.client()
            .create_entity(EntityKind::Subcategory, "Rebar", Some(100))
            .await
            .unwrap();

        assert_eq!(
            api.created(),
            [(
                "/api/subcategories/add".to_owned(),
                json!({"subcategoryName": "Rebar", "categoryId": 100})
            )]
        );
    }

    #[tokio::test]
    async fn summary_passes_filters_as_query() {
        let api = FakeApi::spawn(FakeApiData::default()).await;
        let filter = SummaryFilter {
            project_id: Some(1),
            category_id: Some(100),
            ..Default::default()
        };

        api.client().dashboard_summary(&filter).await.unwrap();

        assert_eq!(
            api.summary_queries(),
            ["projectId=1&categoryId=100".to_owned()]
        );
    }

    #[tokio::test]
    async fn unreachable_api_is_a_request_error() {
        let client = FakeApi::unreachable_client();

        let result = client.expenses().await;

        assert!(matches!(result, Err(Error::ApiRequest(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn missing_bill_file_is_not_found() {
        let api = FakeApi::spawn(FakeApiData::default()).await;

        let result = api.client().bill_file("missing.pdf").await;

        assert!(matches!(result, Err(Error::NotFound)));
    }
}
