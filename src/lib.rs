//! # datora-adapters
//!
//! Infrastructure adapters shared by the datora services.
#![deny(unsafe_code)]

//! ## Features
//!
//! - **Multipart HTTP adapter**: encodes a field map as `multipart/form-data`,
//!   sends it through a pooled `reqwest` client and returns every completed
//!   exchange as data, whatever the status code.
//! - **Audit mirroring**: when a traced request correlates with an indexed
//!   event, a snapshot of the request and response is written to a search
//!   index. Mirroring never changes the result handed back to the caller.
//! - **SQL naming**: builds bracket-quoted table, alias and column references
//!   for the MSSQL query layer.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use datora_adapters::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AdapterError> {
//!     let adapter = FormDataRequestAdapter::builder()
//!         .config(AdapterConfig::from_env())
//!         .build()?;
//!
//!     let request = HttpRequest::post("https://api.example.com/upload")
//!         .with_header("x-client", "datora")
//!         .with_field("msisdn", "5511999999999")
//!         .with_field("payload", serde_json::json!({ "plan": "pro" }));
//!
//!     let response = adapter.request(request).await?;
//!     println!("{} {}", response.status_code, response.body);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod defaults;
pub mod error;
pub mod execution;
pub mod observability;
pub mod sql;
pub mod types;

pub use error::{AdapterError, Result};

/// Commonly used types, re-exported for glob import.
pub mod prelude {
    pub use crate::config::{AdapterConfig, AuditConfig, AuditMode, SearchConfig};
    pub use crate::error::{AdapterError, ErrorCategory};
    pub use crate::execution::{FormDataRequestAdapter, FormDataRequestAdapterBuilder, HttpClient};
    pub use crate::observability::audit::AuditMirror;
    pub use crate::observability::ids::{IdGenerator, UuidGenerator};
    pub use crate::observability::search::{ElasticsearchIndex, MemorySearchIndex, SearchIndex};
    pub use crate::observability::trace::{NoTrace, ScopedTrace, TraceIds, TraceSource};
    pub use crate::sql::{SqlConfig, TableDescriptor, TableFactory, TableOptions};
    pub use crate::types::{AuditDocument, HttpMethod, HttpRequest, HttpResponse, PoolConfig};
}
