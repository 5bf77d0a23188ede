//! Default Configuration Values
//!
//! This module centralizes the default values used throughout the adapters.
//! Having defaults in one place makes them easier to maintain, document, and adjust.

use std::time::Duration;

/// HTTP connection pool defaults
pub mod http {
    use super::*;

    /// Maximum number of requests in flight through one adapter
    pub const MAX_SOCKETS: usize = 100;

    /// Idle connections kept warm per host
    pub const MAX_IDLE_SOCKETS: usize = 10;

    /// Active timeout covering the whole request, body included
    pub const ACTIVE_TIMEOUT: Duration = Duration::from_secs(60);

    /// How long an idle pooled connection is kept before it is closed
    pub const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

    /// TCP keep-alive probe interval
    pub const TCP_KEEP_ALIVE: Duration = Duration::from_secs(60);

    /// Default User-Agent string for outbound requests
    pub const USER_AGENT: &str = concat!("datora-adapters/", env!("CARGO_PKG_VERSION"));
}

/// Search index defaults
pub mod search {
    /// Index holding the correlation (event) documents
    pub const EVENT_INDEX: &str = "datora-event";

    /// Index receiving the mirrored request/response documents
    pub const AUDIT_INDEX: &str = "datora-http-request";

    /// Elasticsearch endpoint used when nothing is configured
    pub const ELASTICSEARCH_URL: &str = "http://localhost:9200";
}

/// Logging defaults
pub mod logging {
    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    /// Header names whose values are masked in logs
    pub const SENSITIVE_HEADERS: &[&str] = &[
        "authorization",
        "proxy-authorization",
        "x-api-key",
        "cookie",
        "set-cookie",
    ];
}
