//! Audit document mirrored into the search index.

use super::http::HttpMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A payload snapshot: structured values go under `body`, anything else is
/// stringified under `rawBody`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BodySnapshot {
    #[serde(rename = "body")]
    Body(Value),
    #[serde(rename = "rawBody")]
    RawBody(String),
}

impl BodySnapshot {
    /// Objects, arrays and `null` count as structured.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) | Value::Array(_) | Value::Null => Self::Body(value.clone()),
            Value::String(s) => Self::RawBody(s.clone()),
            other => Self::RawBody(other.to_string()),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Self::RawBody(_))
    }
}

/// Request leg of an audit document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRequest {
    /// Fresh id minted for this audit entry
    pub transaction_id: String,
    pub url: String,
    pub method: HttpMethod,
    #[serde(flatten)]
    pub payload: BodySnapshot,
    pub headers: HashMap<String, String>,
}

/// Response leg of an audit document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResponse {
    pub status_code: u16,
    #[serde(flatten)]
    pub payload: BodySnapshot,
    pub headers: HashMap<String, String>,
}

/// Denormalized request/response record. Created once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDocument {
    /// Copied from the correlation document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Value>,
    /// Copied from the correlation document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mvno: Option<Value>,
    pub trace_id: String,
    /// Transaction id of the traced span, i.e. the correlation document id
    pub event_id: String,
    pub request: AuditRequest,
    pub response: AuditResponse,
    pub created_at: DateTime<Utc>,
}
