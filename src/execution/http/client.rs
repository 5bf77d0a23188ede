//! HTTP client builder
//!
//! Builds the pooled `reqwest::Client` owned by one adapter. The client is
//! created once and shared by every request issued through that adapter.

use crate::error::AdapterError;
use crate::types::PoolConfig;

/// Build an HTTP client from `PoolConfig`
///
/// # Arguments
/// * `config` - pool sizing, timeouts, proxy and user agent
///
/// # Returns
/// * `Ok(reqwest::Client)` - Configured HTTP client
/// * `Err(AdapterError)` - Configuration or build error
///
/// # Example
/// ```rust,no_run
/// use datora_adapters::types::PoolConfig;
/// use datora_adapters::execution::http::build_http_client;
///
/// let client = build_http_client(&PoolConfig::default())?;
/// # Ok::<(), datora_adapters::AdapterError>(())
/// ```
pub fn build_http_client(config: &PoolConfig) -> Result<reqwest::Client, AdapterError> {
    config.validate()?;

    let mut builder = reqwest::Client::builder()
        .pool_max_idle_per_host(config.max_idle_sockets)
        .pool_idle_timeout(config.idle_timeout)
        .tcp_keepalive(config.tcp_keep_alive);

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }

    if let Some(proxy_url) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| AdapterError::ConfigurationError(format!("Invalid proxy URL: {e}")))?;
        builder = builder.proxy(proxy);
    }

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent);
    }

    builder
        .build()
        .map_err(|e| AdapterError::ConfigurationError(format!("Failed to create HTTP client: {e}")))
}
