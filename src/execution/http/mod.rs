//! HTTP building blocks used by the dispatcher.

pub mod client;
pub mod headers;
pub mod multipart;

pub use client::build_http_client;
pub use multipart::{FormField, encode_form_fields};
