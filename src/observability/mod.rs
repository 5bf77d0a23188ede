//! Observability Module
//!
//! - `logging`: `tracing` subscriber setup for binaries embedding the adapters
//! - `trace`: the trace/transaction pair of the current execution
//! - `ids`: id generation for audit entries
//! - `search`: search index clients (Elasticsearch, in-memory)
//! - `audit`: mirrors request/response pairs into the search index
//!
//! `logging` is internal diagnostics; `audit` exports data to an external
//! store. Neither may fail a request.

pub mod audit;
pub mod ids;
pub mod logging;
pub mod search;
pub mod trace;

pub use audit::AuditMirror;
pub use ids::{IdGenerator, UuidGenerator};
pub use logging::{LoggingConfig, OutputFormat, build_subscriber, init_subscriber};
pub use search::{ElasticsearchIndex, MemorySearchIndex, SearchIndex};
pub use trace::{NoTrace, ScopedTrace, TraceIds, TraceSource};
