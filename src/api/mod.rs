//! Access to the remote expense API.

mod client;
pub(crate) mod wire;

pub use client::ApiClient;
