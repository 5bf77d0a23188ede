//! Audit mirroring.
//!
//! After a request completes, the mirror checks whether the traced
//! transaction belongs to an indexed event and, if so, records a snapshot of
//! the exchange. Every failure is logged and absorbed: the caller's response
//! is settled before mirroring starts.

use super::ids::{IdGenerator, UuidGenerator};
use super::search::SearchIndex;
use super::trace::TraceIds;
use crate::config::AuditConfig;
use crate::error::AdapterError;
use crate::types::{
    AuditDocument, AuditRequest, AuditResponse, BodySnapshot, HttpRequest, HttpResponse,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;

/// Writes audit documents for traced, correlated requests
#[derive(Clone)]
pub struct AuditMirror {
    index: Arc<dyn SearchIndex>,
    ids: Arc<dyn IdGenerator>,
    event_index: String,
    audit_index: String,
}

impl std::fmt::Debug for AuditMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditMirror")
            .field("event_index", &self.event_index)
            .field("audit_index", &self.audit_index)
            .finish_non_exhaustive()
    }
}

impl AuditMirror {
    /// Mirror into `index` using the default index names and UUID ids
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        let config = AuditConfig::default();
        Self {
            index,
            ids: Arc::new(UuidGenerator),
            event_index: config.event_index,
            audit_index: config.audit_index,
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_indices(
        mut self,
        event_index: impl Into<String>,
        audit_index: impl Into<String>,
    ) -> Self {
        self.event_index = event_index.into();
        self.audit_index = audit_index.into();
        self
    }

    pub fn event_index(&self) -> &str {
        &self.event_index
    }

    pub fn audit_index(&self) -> &str {
        &self.audit_index
    }

    /// Best-effort mirroring; failures are logged, never returned.
    pub async fn mirror(
        &self,
        trace: Option<&TraceIds>,
        request: &HttpRequest,
        response: &HttpResponse,
    ) {
        let span = tracing::debug_span!(
            "audit_mirror",
            audit.index = %self.audit_index,
            trace.transaction_id = trace.map(|t| t.transaction_id.as_str()).unwrap_or_default(),
        );
        let outcome = self.try_mirror(trace, request, response).instrument(span).await;
        match outcome {
            Ok(Some(_)) => tracing::debug!(index = %self.audit_index, "audit document written"),
            Ok(None) => {}
            Err(e) => tracing::warn!(
                error = %e,
                url = %request.url,
                "Failed to mirror HTTP request into audit index"
            ),
        }
    }

    /// Mirror and report the outcome.
    ///
    /// Returns `Ok(None)` when there is no trace or no correlation document,
    /// and the written document otherwise.
    pub async fn try_mirror(
        &self,
        trace: Option<&TraceIds>,
        request: &HttpRequest,
        response: &HttpResponse,
    ) -> Result<Option<AuditDocument>, AdapterError> {
        let Some(trace) = trace else {
            tracing::trace!("no trace context, skipping audit");
            return Ok(None);
        };

        let Some(correlation) = self
            .index
            .get_by_id(&self.event_index, &trace.transaction_id)
            .await?
        else {
            tracing::debug!(
                transaction_id = %trace.transaction_id,
                "no correlated event, skipping audit"
            );
            return Ok(None);
        };

        let document = self.build_document(trace, &correlation, request, response);
        self.index
            .create(&self.audit_index, serde_json::to_value(&document)?)
            .await?;
        Ok(Some(document))
    }

    /// Assemble the audit document for one exchange
    pub fn build_document(
        &self,
        trace: &TraceIds,
        correlation: &Value,
        request: &HttpRequest,
        response: &HttpResponse,
    ) -> AuditDocument {
        AuditDocument {
            event: correlation.get("event").cloned(),
            mvno: correlation.get("mvno").cloned(),
            trace_id: trace.trace_id.clone(),
            event_id: trace.transaction_id.clone(),
            request: AuditRequest {
                transaction_id: self.ids.generate(),
                url: request.url.clone(),
                method: request.method,
                payload: BodySnapshot::from_value(&Value::Object(request.body.clone())),
                headers: request.headers.clone(),
            },
            response: AuditResponse {
                status_code: response.status_code,
                payload: BodySnapshot::from_value(&response.body),
                headers: response.headers.clone(),
            },
            created_at: chrono::Utc::now(),
        }
    }
}
