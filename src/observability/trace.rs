//! Trace context.
//!
//! The dispatcher needs the trace/transaction pair of the current execution
//! to correlate a request with an indexed event. It is resolved through an
//! injected [`TraceSource`] or passed per call.

use serde::{Deserialize, Serialize};
use std::future::Future;

/// Trace id plus the id of the enclosing transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceIds {
    pub trace_id: String,
    pub transaction_id: String,
}

impl TraceIds {
    pub fn new(trace_id: impl Into<String>, transaction_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            transaction_id: transaction_id.into(),
        }
    }
}

/// Resolves the trace pair for the current execution
pub trait TraceSource: Send + Sync {
    fn current(&self) -> Option<TraceIds>;
}

/// Never traced
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceSource for NoTrace {
    fn current(&self) -> Option<TraceIds> {
        None
    }
}

impl<F> TraceSource for F
where
    F: Fn() -> Option<TraceIds> + Send + Sync,
{
    fn current(&self) -> Option<TraceIds> {
        self()
    }
}

tokio::task_local! {
    static CURRENT_TRACE: TraceIds;
}

/// Task-local trace scope.
///
/// ```rust,ignore
/// let response = ScopedTrace::scope(ids, adapter.request(request)).await?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopedTrace;

impl ScopedTrace {
    /// Run `future` with `ids` as the current trace
    pub async fn scope<F: Future>(ids: TraceIds, future: F) -> F::Output {
        CURRENT_TRACE.scope(ids, future).await
    }
}

impl TraceSource for ScopedTrace {
    fn current(&self) -> Option<TraceIds> {
        CURRENT_TRACE.try_with(Clone::clone).ok()
    }
}
