//! Multipart HTTP dispatcher.
//!
//! `FormDataRequestAdapter` sends an [`HttpRequest`] as `multipart/form-data`
//! through a pooled client and returns the exchange as an [`HttpResponse`].
//! Status codes are data: a 404 or 503 comes back as `Ok`. Only a transport
//! failure, where no response exists, is an error.
//!
//! Once a response exists the audit mirror runs (see
//! [`crate::observability::audit`]); its outcome never reaches the caller.

use crate::config::{AdapterConfig, AuditMode};
use crate::error::AdapterError;
use crate::execution::http::headers::{
    format_headers_for_logging, headermap_to_hashmap, multipart_headers,
};
use crate::execution::http::{build_http_client, multipart};
use crate::observability::audit::AuditMirror;
use crate::observability::ids::IdGenerator;
use crate::observability::search::{ElasticsearchIndex, SearchIndex};
use crate::observability::trace::{NoTrace, TraceIds, TraceSource};
use crate::types::{HttpRequest, HttpResponse, PoolConfig};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::Instrument;

/// HTTP client seam used by callers
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, AdapterError>;
}

/// Pooled `reqwest` client plus the in-flight bound. Built once per adapter.
#[derive(Debug)]
struct ConnectionPool {
    client: reqwest::Client,
    sockets: Semaphore,
    config: PoolConfig,
}

/// Multipart HTTP adapter with optional audit mirroring.
///
/// Cloning is cheap and clones share the same connection pool.
#[derive(Clone)]
pub struct FormDataRequestAdapter {
    pool: Arc<ConnectionPool>,
    mirror: Option<AuditMirror>,
    audit_mode: AuditMode,
    trace_source: Arc<dyn TraceSource>,
}

impl std::fmt::Debug for FormDataRequestAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormDataRequestAdapter")
            .field("pool", &self.pool.config)
            .field("mirror", &self.mirror)
            .field("audit_mode", &self.audit_mode)
            .finish_non_exhaustive()
    }
}

impl FormDataRequestAdapter {
    pub fn builder() -> FormDataRequestAdapterBuilder {
        FormDataRequestAdapterBuilder::default()
    }

    /// Adapter with the default pool and no mirroring
    pub fn new() -> Result<Self, AdapterError> {
        Self::builder().build()
    }

    pub fn pool_config(&self) -> &PoolConfig {
        &self.pool.config
    }

    /// Requests that may still start before callers queue for a socket
    pub fn available_sockets(&self) -> usize {
        self.pool.sockets.available_permits()
    }

    /// Send `request` with an explicit trace context, bypassing the
    /// configured `TraceSource`.
    pub async fn request_with_trace(
        &self,
        request: HttpRequest,
        trace: Option<TraceIds>,
    ) -> Result<HttpResponse, AdapterError> {
        let span = tracing::info_span!(
            "http_request",
            request.url = %request.url,
            request.method = %request.method,
            response.status_code = tracing::field::Empty,
        );

        let response = self.dispatch(&request).instrument(span.clone()).await?;
        span.record("response.status_code", response.status_code);

        self.run_mirror(trace, request, &response).instrument(span).await;
        Ok(response)
    }

    async fn dispatch(&self, request: &HttpRequest) -> Result<HttpResponse, AdapterError> {
        // 1. Validate headers and encode the body before any network I/O
        let prepared = multipart_headers(&request.headers)?;
        if let Some(content_type) = &prepared.replaced_content_type {
            tracing::debug!(
                %content_type,
                "caller Content-Type replaced by multipart boundary"
            );
        }
        let fields = multipart::encode_form_fields(&request.body)?;
        tracing::debug!(
            headers = %format_headers_for_logging(&request.headers),
            fields = fields.len(),
            "sending multipart request"
        );
        let form = multipart::build_form(fields);

        // 2. Bound concurrent sockets
        let _permit = self
            .pool
            .sockets
            .acquire()
            .await
            .map_err(|e| AdapterError::RequestError(format!("connection pool closed: {e}")))?;

        // 3. Send; `.headers` after `.multipart` keeps the boundary Content-Type.
        // An unparseable URL is a configuration error, anything else is transport.
        let response = self
            .pool
            .client
            .request(request.method.into(), request.url.as_str())
            .multipart(form)
            .headers(prepared.headers)
            .send()
            .await
            .map_err(AdapterError::from)?;

        // 4. Normalize; a body that cannot be read means no complete response
        let status_code = response.status().as_u16();
        let headers = headermap_to_hashmap(response.headers());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AdapterError::RequestError(format!("failed to read response body: {e}")))?;
        let body = HttpResponse::decode_body(&bytes);

        tracing::debug!(
            status = status_code,
            headers = %format_headers_for_logging(&headers),
            body_len = bytes.len(),
            "received response"
        );

        Ok(HttpResponse {
            status_code,
            body,
            headers,
        })
    }

    async fn run_mirror(
        &self,
        trace: Option<TraceIds>,
        request: HttpRequest,
        response: &HttpResponse,
    ) {
        let Some(mirror) = &self.mirror else {
            return;
        };
        match self.audit_mode {
            AuditMode::Disabled => {}
            AuditMode::Inline => mirror.mirror(trace.as_ref(), &request, response).await,
            AuditMode::Detached => {
                let mirror = mirror.clone();
                let response = response.clone();
                tokio::spawn(
                    async move {
                        mirror.mirror(trace.as_ref(), &request, &response).await;
                    }
                    .in_current_span(),
                );
            }
        }
    }
}

#[async_trait]
impl HttpClient for FormDataRequestAdapter {
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, AdapterError> {
        let trace = self.trace_source.current();
        self.request_with_trace(request, trace).await
    }
}

/// Builder for `FormDataRequestAdapter`
#[derive(Default)]
pub struct FormDataRequestAdapterBuilder {
    config: AdapterConfig,
    search_index: Option<Arc<dyn SearchIndex>>,
    trace_source: Option<Arc<dyn TraceSource>>,
    id_generator: Option<Arc<dyn IdGenerator>>,
}

impl FormDataRequestAdapterBuilder {
    pub fn config(mut self, config: AdapterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn pool(mut self, pool: PoolConfig) -> Self {
        self.config.pool = pool;
        self
    }

    pub fn audit_mode(mut self, mode: AuditMode) -> Self {
        self.config.audit.mode = mode;
        self
    }

    /// Mirror into this index instead of the configured Elasticsearch
    pub fn search_index(mut self, index: Arc<dyn SearchIndex>) -> Self {
        self.search_index = Some(index);
        self
    }

    pub fn trace_source(mut self, source: Arc<dyn TraceSource>) -> Self {
        self.trace_source = Some(source);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = Some(ids);
        self
    }

    /// Build the adapter; the connection pool is created here, once.
    pub fn build(self) -> Result<FormDataRequestAdapter, AdapterError> {
        let config = self.config;
        let client = build_http_client(&config.pool)?;

        let search_index = match (self.search_index, &config.search) {
            (Some(index), _) => Some(index),
            (None, Some(search)) => Some(Arc::new(ElasticsearchIndex::from_config(
                search,
                client.clone(),
            )) as Arc<dyn SearchIndex>),
            (None, None) => None,
        };

        let mirror = search_index
            .filter(|_| config.audit.mode != AuditMode::Disabled)
            .map(|index| {
                let mirror = AuditMirror::new(index)
                    .with_indices(&config.audit.event_index, &config.audit.audit_index);
                match self.id_generator {
                    Some(ids) => mirror.with_id_generator(ids),
                    None => mirror,
                }
            });

        tracing::debug!(
            max_sockets = config.pool.max_sockets,
            audit = mirror.is_some(),
            "multipart adapter ready"
        );

        Ok(FormDataRequestAdapter {
            pool: Arc::new(ConnectionPool {
                client,
                sockets: Semaphore::new(config.pool.max_sockets),
                config: config.pool,
            }),
            mirror,
            audit_mode: config.audit.mode,
            trace_source: self.trace_source.unwrap_or_else(|| Arc::new(NoTrace)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::observability::search::MemorySearchIndex;

    #[test]
    fn builder_without_search_has_no_mirror() {
        let adapter = FormDataRequestAdapter::new().unwrap();
        assert!(adapter.mirror.is_none());
        assert_eq!(adapter.available_sockets(), 100);
    }

    #[test]
    fn builder_uses_configured_elasticsearch() {
        let config = AdapterConfig {
            search: Some(SearchConfig::default()),
            ..Default::default()
        };
        let adapter = FormDataRequestAdapter::builder().config(config).build().unwrap();
        assert!(adapter.mirror.is_some());
    }

    #[test]
    fn disabled_mode_drops_the_mirror() {
        let adapter = FormDataRequestAdapter::builder()
            .search_index(Arc::new(MemorySearchIndex::new()))
            .audit_mode(AuditMode::Disabled)
            .build()
            .unwrap();
        assert!(adapter.mirror.is_none());
    }

    #[test]
    fn clones_share_the_pool() {
        let adapter = FormDataRequestAdapter::builder()
            .pool(PoolConfig::builder().max_sockets(4).max_idle_sockets(1).build())
            .build()
            .unwrap();
        let clone = adapter.clone();
        assert!(Arc::ptr_eq(&adapter.pool, &clone.pool));
        assert_eq!(clone.pool_config().max_sockets, 4);
    }

    #[test]
    fn invalid_pool_fails_to_build() {
        let result = FormDataRequestAdapter::builder()
            .pool(PoolConfig::builder().max_sockets(0).build())
            .build();
        assert!(result.is_err());
    }
}
