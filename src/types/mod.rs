//! Shared data types.
//!
//! - `http`: request/response shapes handed to and returned by the adapter
//! - `pool`: connection pool settings
//! - `audit`: the document mirrored into the search index

pub mod audit;
pub mod http;
pub mod pool;

pub use audit::{AuditDocument, AuditRequest, AuditResponse, BodySnapshot};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use pool::{PoolConfig, PoolConfigBuilder};
