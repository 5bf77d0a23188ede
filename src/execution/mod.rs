//! Request execution.
//!
//! - `http`: client construction, header handling and multipart encoding
//! - `dispatcher`: the `HttpClient` seam and its multipart implementation

pub mod dispatcher;
pub mod http;

pub use dispatcher::{FormDataRequestAdapter, FormDataRequestAdapterBuilder, HttpClient};
