//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, hierarchy::Level, internal_server_error::InternalServerError,
    not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request to the expense API could not be sent or no response was received.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not reach the expense API: {0}")]
    ApiRequest(String),

    /// The expense API responded with a non-success status code.
    #[error("the expense API responded with status {0}")]
    ApiStatus(StatusCode),

    /// The body returned by the expense API could not be decoded.
    #[error("could not decode the expense API response: {0}")]
    ApiDecode(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A child entity was requested or created without its parent being selected.
    ///
    /// Holds the level that must be selected first.
    #[error("a {0} must be selected first")]
    MissingParent(Level),

    /// An empty string was used as the name of a new entity.
    #[error("name cannot be empty")]
    EmptyName,

    /// The kind of entity to create is not one the app knows about.
    #[error("cannot create an entity of kind \"{0}\"")]
    InvalidEntityKind(String),

    /// A required field of the expense form was left empty.
    #[error("the field \"{0}\" is required")]
    MissingField(&'static str),

    /// The multipart form could not be parsed.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The filtered expenses could not be written as CSV.
    #[error("could not write CSV: {0}")]
    CsvExport(String),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Error::ApiDecode(value.to_string())
        } else if let Some(status) = value.status() {
            Error::ApiStatus(status)
        } else {
            Error::ApiRequest(value.to_string())
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::ApiRequest(_) | Error::ApiStatus(_) | Error::ApiDecode(_) => {
                tracing::error!("Could not load data from the expense API: {}", self);
                InternalServerError {
                    description: "Could not load your expenses",
                    fix: "The expense service did not respond. Try again in a few minutes.",
                }
                .into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::MissingParent(level) => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: format!("Please select a {level} first"),
                },
            ),
            Error::EmptyName => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Please enter a name before adding".to_owned(),
                },
            ),
            Error::InvalidEntityKind(_) => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Cannot add: invalid type.".to_owned(),
                },
            ),
            Error::MissingField(field) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: format!("Missing {field}"),
                    details: format!("Fill in the {field} field before saving the expense."),
                },
            ),
            Error::MultipartError(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not read the form".to_owned(),
                    details,
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Expense not found".to_owned(),
                    details: "The expense could not be found. \
                    Try refreshing the page to see if it has already been deleted."
                        .to_owned(),
                },
            ),
            Error::ApiRequest(_) | Error::ApiStatus(_) | Error::ApiDecode(_) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "Could not save your changes".to_owned(),
                    details: "The expense service rejected the request or did not respond. \
                    Your changes have not been lost, try again."
                        .to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
