//! Implements a struct that holds the state of the REST server.

use crate::{api::ApiClient, pagination::PaginationConfig};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The client for the remote expense API.
    pub api: ApiClient,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl AppState {
    /// Create a new [AppState] that talks to the expense API through `api`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Asia/Kolkata".
    pub fn new(api: ApiClient, local_timezone: &str, pagination_config: PaginationConfig) -> Self {
        Self {
            api,
            local_timezone: local_timezone.to_owned(),
            pagination_config,
        }
    }
}
