#![allow(missing_docs)]

pub(crate) mod fake_api;
mod form;
mod html;
mod http;
mod multipart;
mod stub_fetcher;

pub(crate) use form::{assert_hx_endpoint, must_get_form};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_content_type, assert_hx_redirect, get_header};
pub(crate) use multipart::must_make_multipart;
pub(crate) use stub_fetcher::StubFetcher;
