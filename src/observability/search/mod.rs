//! Search index clients.
//!
//! The audit mirror reads correlation documents from, and writes audit
//! documents to, a document store addressed by index name and id.

pub mod elasticsearch;
pub mod memory;

pub use elasticsearch::{ElasticsearchAuth, ElasticsearchIndex};
pub use memory::MemorySearchIndex;

use crate::error::AdapterError;
use async_trait::async_trait;
use serde_json::Value;

/// Document store used by the audit mirror
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Fetch a document by id; `Ok(None)` when it does not exist
    async fn get_by_id(&self, index: &str, id: &str) -> Result<Option<Value>, AdapterError>;

    /// Create a new document with a store-assigned id
    async fn create(&self, index: &str, document: Value) -> Result<(), AdapterError>;
}
