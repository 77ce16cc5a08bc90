use axum::{
    extract::{FromRequest, Multipart},
    http::{Request, header::CONTENT_TYPE},
};

/// Build a multipart request body the way a browser submits the expense form.
///
/// `file` is `(field name, file name, content type, contents)`.
pub(crate) async fn must_make_multipart(
    text_fields: &[(&str, &str)],
    file: Option<(&str, &str, &str, &str)>,
) -> Multipart {
    let boundary = "MY_BOUNDARY123456789";
    let boundary_start = format!("--{boundary}");
    let boundary_end = format!("--{boundary}--");

    let mut lines: Vec<String> = Vec::new();

    for (name, value) in text_fields {
        lines.push(boundary_start.clone());
        lines.push(format!("Content-Disposition: form-data; name=\"{name}\""));
        lines.push(String::new());
        lines.push((*value).to_owned());
    }

    if let Some((name, file_name, content_type, contents)) = file {
        lines.push(boundary_start.clone());
        lines.push(format!(
            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\""
        ));
        lines.push(format!("Content-Type: {content_type}"));
        lines.push(String::new());
        lines.push(contents.to_owned());
    }

    lines.push(boundary_end);

    let data = lines.join("\r\n").into_bytes();

    let request = Request::builder()
        .method("POST")
        .uri("/api/expenses")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(data.into())
        .unwrap();

    Multipart::from_request(request, &{}).await.unwrap()
}
