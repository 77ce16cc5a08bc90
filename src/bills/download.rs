//! Bill file downloads, proxied from the expense API.

use axum::{
    extract::{Path, State},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use reqwest::Url;

use crate::{
    Error,
    bills::BillsState,
    endpoints::{self, format_endpoint},
};

/// The link to download the bill stored as `file_name`.
pub fn bill_file_url(file_name: &str) -> String {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return format_endpoint(endpoints::BILL_FILE, file_name);
    };

    match url.path_segments_mut() {
        Ok(mut segments) => {
            segments.pop_if_empty().extend(["bills", "files", file_name]);
        }
        Err(()) => return format_endpoint(endpoints::BILL_FILE, file_name),
    }

    url.path().to_owned()
}

/// A route handler that streams a bill file from the expense API to the browser.
pub async fn get_bill_file(
    State(state): State<BillsState>,
    Path(filename): Path<String>,
) -> Response {
    match state.api.bill_file(&filename).await {
        Ok(bill) => {
            let content_type = bill
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_owned());
            let disposition = format!(
                "attachment; filename=\"{}\"",
                filename.replace(['"', '\\'], "_")
            );

            (
                [(CONTENT_TYPE, content_type), (CONTENT_DISPOSITION, disposition)],
                bill.bytes,
            )
                .into_response()
        }
        Err(Error::NotFound) => {
            tracing::warn!("Bill file {filename} does not exist");
            (StatusCode::NOT_FOUND, "Bill file not found").into_response()
        }
        Err(error) => {
            tracing::error!("Could not download bill file {filename}: {error}");
            (StatusCode::BAD_GATEWAY, "Could not download the bill file").into_response()
        }
    }
}
