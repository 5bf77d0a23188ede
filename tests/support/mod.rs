//! Shared test fixtures: a search index that records calls and can be told to fail.

#![allow(dead_code)]

use async_trait::async_trait;
use datora_adapters::AdapterError;
use datora_adapters::observability::search::SearchIndex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Search index double counting lookups and creates
#[derive(Default)]
pub struct RecordingIndex {
    correlations: HashMap<(String, String), Value>,
    created: Mutex<Vec<(String, Value)>>,
    lookups: AtomicUsize,
    fail_lookups: bool,
    fail_creates: bool,
}

impl RecordingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_correlation(mut self, index: &str, id: &str, document: Value) -> Self {
        self.correlations
            .insert((index.to_string(), id.to_string()), document);
        self
    }

    pub fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    pub fn failing_creates(mut self) -> Self {
        self.fail_creates = true;
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<(String, Value)> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchIndex for RecordingIndex {
    async fn get_by_id(&self, index: &str, id: &str) -> Result<Option<Value>, AdapterError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups {
            return Err(AdapterError::search_index(Some(503), "lookup unavailable"));
        }
        Ok(self
            .correlations
            .get(&(index.to_string(), id.to_string()))
            .cloned())
    }

    async fn create(&self, index: &str, document: Value) -> Result<(), AdapterError> {
        self.created
            .lock()
            .unwrap()
            .push((index.to_string(), document));
        if self.fail_creates {
            return Err(AdapterError::search_index(Some(429), "create rejected"));
        }
        Ok(())
    }
}

/// Pull the value of a text part out of a raw multipart body
pub fn multipart_field(body: &str, name: &str) -> Option<String> {
    let marker = format!("name=\"{name}\"");
    let start = body.find(&marker)? + marker.len();
    let rest = &body[start..];
    let value_start = rest.find("\r\n\r\n")? + 4;
    let rest = &rest[value_start..];
    let value_end = rest.find("\r\n--")?;
    Some(rest[..value_end].to_string())
}
