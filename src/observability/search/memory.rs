//! In-process search index.

use super::SearchIndex;
use crate::error::AdapterError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Search index kept in memory, for tests and local runs
#[derive(Debug, Default)]
pub struct MemorySearchIndex {
    indices: RwLock<HashMap<String, Vec<(String, Value)>>>,
}

impl MemorySearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document under an explicit id, replacing any previous one
    pub async fn insert(&self, index: &str, id: impl Into<String>, document: Value) {
        let id = id.into();
        let mut indices = self.indices.write().await;
        let docs = indices.entry(index.to_string()).or_default();
        match docs.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = document,
            None => docs.push((id, document)),
        }
    }

    /// All documents of an index, in insertion order
    pub async fn documents(&self, index: &str) -> Vec<Value> {
        self.indices
            .read()
            .await
            .get(index)
            .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default()
    }

    pub async fn count(&self, index: &str) -> usize {
        self.indices
            .read()
            .await
            .get(index)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl SearchIndex for MemorySearchIndex {
    async fn get_by_id(&self, index: &str, id: &str) -> Result<Option<Value>, AdapterError> {
        Ok(self.indices.read().await.get(index).and_then(|docs| {
            docs.iter()
                .find(|(existing, _)| existing == id)
                .map(|(_, doc)| doc.clone())
        }))
    }

    async fn create(&self, index: &str, document: Value) -> Result<(), AdapterError> {
        self.insert(index, Uuid::new_v4().to_string(), document).await;
        Ok(())
    }
}
