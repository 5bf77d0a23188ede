//! Adapter configuration.
//!
//! Values come from code (builders, struct literals) or from `DATORA_*`
//! environment variables via [`AdapterConfig::from_env`]; anything unset
//! falls back to [`crate::defaults`].

use crate::defaults;
use crate::types::PoolConfig;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// When the audit mirror runs relative to returning the response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditMode {
    /// Await the mirror before returning
    #[default]
    Inline,
    /// Spawn the mirror on the runtime and return immediately
    Detached,
    /// Never mirror
    Disabled,
}

impl FromStr for AuditMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(Self::Inline),
            "detached" | "background" => Ok(Self::Detached),
            "disabled" | "off" | "false" | "0" => Ok(Self::Disabled),
            other => Err(format!("unknown audit mode: {other}")),
        }
    }
}

/// Audit mirror settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub mode: AuditMode,
    /// Index holding correlation documents, keyed by transaction id
    pub event_index: String,
    /// Index receiving audit documents
    pub audit_index: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            mode: AuditMode::default(),
            event_index: defaults::search::EVENT_INDEX.to_string(),
            audit_index: defaults::search::AUDIT_INDEX.to_string(),
        }
    }
}

/// Elasticsearch connection settings
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub api_key: Option<SecretString>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: defaults::search::ELASTICSEARCH_URL.to_string(),
            username: None,
            password: None,
            api_key: None,
        }
    }
}

/// Everything needed to assemble a `FormDataRequestAdapter`
#[derive(Debug, Clone, Default)]
pub struct AdapterConfig {
    pub pool: PoolConfig,
    pub audit: AuditConfig,
    /// Search index to mirror into; `None` disables mirroring unless an index
    /// is injected through the builder
    pub search: Option<SearchConfig>,
}

impl AdapterConfig {
    /// Read `DATORA_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit lookup function.
    /// Unparseable values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(secs) = parse_var::<u64>(&get, "DATORA_HTTP_TIMEOUT_SECS") {
            config.pool.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(max) = parse_var::<usize>(&get, "DATORA_HTTP_MAX_SOCKETS") {
            config.pool.max_sockets = max;
        }
        // The idle pool never outgrows the socket bound unless set explicitly
        config.pool.max_idle_sockets =
            match parse_var::<usize>(&get, "DATORA_HTTP_MAX_IDLE_SOCKETS") {
                Some(idle) => idle,
                None => config.pool.max_idle_sockets.min(config.pool.max_sockets),
            };
        if let Some(mode) = parse_var::<AuditMode>(&get, "DATORA_AUDIT_MODE") {
            config.audit.mode = mode;
        }
        if let Some(index) = get("DATORA_EVENT_INDEX") {
            config.audit.event_index = index;
        }
        if let Some(index) = get("DATORA_AUDIT_INDEX") {
            config.audit.audit_index = index;
        }

        config.search = get("DATORA_ELASTICSEARCH_URL").map(|url| SearchConfig {
            url,
            username: get("DATORA_ELASTICSEARCH_USERNAME"),
            password: get("DATORA_ELASTICSEARCH_PASSWORD").map(SecretString::from),
            api_key: get("DATORA_ELASTICSEARCH_API_KEY").map(SecretString::from),
        });

        config
    }
}

pub(crate) fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "ignoring invalid environment value");
            None
        }
    }
}
