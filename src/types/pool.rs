//! Connection pool configuration.
//!
//! `PoolConfig` describes the keep-alive pool owned by one adapter instance:
//! how many requests may be in flight, how many idle connections stay warm,
//! and the active/idle timeouts.

use crate::defaults;
use crate::error::AdapterError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Upper bound on concurrent in-flight requests (sockets)
    pub max_sockets: usize,
    /// Idle connections kept per host
    pub max_idle_sockets: usize,
    /// Active timeout for a whole request
    #[serde(with = "duration_option_serde")]
    pub timeout: Option<Duration>,
    /// Idle connections older than this are closed
    #[serde(with = "duration_option_serde")]
    pub idle_timeout: Option<Duration>,
    /// Connection timeout
    #[serde(with = "duration_option_serde")]
    pub connect_timeout: Option<Duration>,
    /// TCP keep-alive; `None` disables it
    #[serde(with = "duration_option_serde")]
    pub tcp_keep_alive: Option<Duration>,
    /// User agent
    pub user_agent: Option<String>,
    /// Proxy URL applied to all schemes
    pub proxy: Option<String>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_sockets: defaults::http::MAX_SOCKETS,
            max_idle_sockets: defaults::http::MAX_IDLE_SOCKETS,
            timeout: Some(defaults::http::ACTIVE_TIMEOUT),
            idle_timeout: Some(defaults::http::IDLE_TIMEOUT),
            connect_timeout: None,
            tcp_keep_alive: Some(defaults::http::TCP_KEEP_ALIVE),
            user_agent: Some(defaults::http::USER_AGENT.to_string()),
            proxy: None,
        }
    }
}

impl PoolConfig {
    /// Returns a builder for constructing `PoolConfig`
    pub fn builder() -> PoolConfigBuilder {
        PoolConfigBuilder::new()
    }

    /// Reject settings the pool cannot honour
    pub fn validate(&self) -> Result<(), AdapterError> {
        if self.max_sockets == 0 {
            return Err(AdapterError::ConfigurationError(
                "max_sockets must be greater than zero".to_string(),
            ));
        }
        if self.max_idle_sockets > self.max_sockets {
            return Err(AdapterError::ConfigurationError(format!(
                "max_idle_sockets ({}) cannot exceed max_sockets ({})",
                self.max_idle_sockets, self.max_sockets
            )));
        }
        Ok(())
    }
}

/// Builder for `PoolConfig`
#[derive(Debug, Clone, Default)]
pub struct PoolConfigBuilder {
    max_sockets: Option<usize>,
    max_idle_sockets: Option<usize>,
    timeout: Option<Option<Duration>>,
    idle_timeout: Option<Option<Duration>>,
    connect_timeout: Option<Duration>,
    tcp_keep_alive: Option<Option<Duration>>,
    user_agent: Option<String>,
    proxy: Option<String>,
}

impl PoolConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_sockets(mut self, max: usize) -> Self {
        self.max_sockets = Some(max);
        self
    }
    pub fn max_idle_sockets(mut self, max: usize) -> Self {
        self.max_idle_sockets = Some(max);
        self
    }
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = Some(timeout);
        self
    }
    pub fn idle_timeout(mut self, idle_timeout: Option<Duration>) -> Self {
        self.idle_timeout = Some(idle_timeout);
        self
    }
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = Some(connect_timeout);
        self
    }
    pub fn tcp_keep_alive(mut self, interval: Option<Duration>) -> Self {
        self.tcp_keep_alive = Some(interval);
        self
    }
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
    pub fn proxy<S: Into<String>>(mut self, proxy: S) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Build the configuration, filling unset values from the defaults
    pub fn build(self) -> PoolConfig {
        let defaults = PoolConfig::default();
        PoolConfig {
            max_sockets: self.max_sockets.unwrap_or(defaults.max_sockets),
            max_idle_sockets: self.max_idle_sockets.unwrap_or(defaults.max_idle_sockets),
            timeout: self.timeout.unwrap_or(defaults.timeout),
            idle_timeout: self.idle_timeout.unwrap_or(defaults.idle_timeout),
            connect_timeout: self.connect_timeout.or(defaults.connect_timeout),
            tcp_keep_alive: self.tcp_keep_alive.unwrap_or(defaults.tcp_keep_alive),
            user_agent: self.user_agent.or(defaults.user_agent),
            proxy: self.proxy.or(defaults.proxy),
        }
    }
}

// Helper module for Duration serialization
mod duration_option_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
