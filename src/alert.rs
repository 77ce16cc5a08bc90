//! Alerts shown in the alert container after an htmx request.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// A message to show the user in a toast-style alert.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A one line success message.
    SuccessSimple { message: String },
    /// An error message with extra details on how to fix it.
    Error { message: String, details: String },
    /// A one line error message.
    ErrorSimple { message: String },
}

impl Alert {
    fn is_error(&self) -> bool {
        matches!(self, Alert::Error { .. } | Alert::ErrorSimple { .. })
    }

    pub fn into_html(self) -> Markup {
        let container_style = if self.is_error() {
            "flex items-start gap-3 p-4 mb-4 text-sm rounded-lg shadow-lg \
            text-red-800 bg-red-50 border border-red-300 \
            dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        } else {
            "flex items-start gap-3 p-4 mb-4 text-sm rounded-lg shadow-lg \
            text-green-800 bg-green-50 border border-green-300 \
            dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        };
        let kind = if self.is_error() { "error" } else { "success" };
        let (message, details) = match self {
            Alert::Error { message, details } => (message, Some(details)),
            Alert::SuccessSimple { message } | Alert::ErrorSimple { message } => (message, None),
        };

        html! {
            div role="alert" data-kind=(kind) class=(container_style)
            {
                div class="flex-1"
                {
                    p class="font-medium" { (message) }

                    @if let Some(details) = details {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    class="ms-auto font-bold"
                    aria-label="Close"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }

    /// Render the alert so htmx swaps it into the alert container alongside
    /// the main response.
    pub fn into_oob_html(self) -> Markup {
        html! {
            div id="alert-container" hx-swap-oob="innerHTML" { (self.into_html()) }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        (StatusCode::OK, self.into_html()).into_response()
    }
}
