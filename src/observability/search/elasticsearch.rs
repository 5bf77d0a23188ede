//! Elasticsearch Index
//!
//! REST client for the two document APIs the audit mirror needs:
//! `GET /{index}/_doc/{id}` and `POST /{index}/_doc`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use datora_adapters::observability::search::{ElasticsearchIndex, SearchIndex};
//!
//! # async fn example() -> Result<(), datora_adapters::AdapterError> {
//! let index = ElasticsearchIndex::new("http://localhost:9200")?;
//! let event = index.get_by_id("datora-event", "a1b2c3").await?;
//! # Ok(())
//! # }
//! ```

use super::SearchIndex;
use crate::config::SearchConfig;
use crate::error::AdapterError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

/// Credentials sent with every call
#[derive(Debug, Clone)]
pub enum ElasticsearchAuth {
    Basic {
        username: String,
        password: SecretString,
    },
    /// Sent as `Authorization: ApiKey <key>`
    ApiKey(SecretString),
}

/// Elasticsearch document client
#[derive(Debug, Clone)]
pub struct ElasticsearchIndex {
    client: Client,
    base_url: String,
    auth: Option<ElasticsearchAuth>,
}

impl ElasticsearchIndex {
    /// Create a client for `base_url` without credentials
    pub fn new(base_url: impl Into<String>) -> Result<Self, AdapterError> {
        let client = Client::builder().build().map_err(|e| {
            AdapterError::ConfigurationError(format!("Failed to create HTTP client: {e}"))
        })?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing `reqwest::Client`
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth: None,
        }
    }

    /// Build from configuration. An API key wins over basic credentials.
    pub fn from_config(config: &SearchConfig, client: Client) -> Self {
        let auth = match (&config.api_key, &config.username, &config.password) {
            (Some(key), _, _) => Some(ElasticsearchAuth::ApiKey(key.clone())),
            (None, Some(username), Some(password)) => Some(ElasticsearchAuth::Basic {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        };
        Self::with_client(client, config.url.clone()).with_auth(auth)
    }

    pub fn with_auth(mut self, auth: Option<ElasticsearchAuth>) -> Self {
        self.auth = auth;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn doc_url(&self, index: &str, id: Option<&str>) -> String {
        match id {
            Some(id) => format!(
                "{}/{}/_doc/{}",
                self.base_url,
                urlencoding::encode(index),
                urlencoding::encode(id)
            ),
            None => format!("{}/{}/_doc", self.base_url, urlencoding::encode(index)),
        }
    }

    fn authorize(&self, rb: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Some(ElasticsearchAuth::Basic { username, password }) => {
                rb.basic_auth(username, Some(password.expose_secret()))
            }
            Some(ElasticsearchAuth::ApiKey(key)) => rb.header(
                reqwest::header::AUTHORIZATION,
                format!("ApiKey {}", key.expose_secret()),
            ),
            None => rb,
        }
    }

    async fn error_from(response: reqwest::Response, action: &str) -> AdapterError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        AdapterError::search_index(
            Some(status.as_u16()),
            format!("Elasticsearch {action} failed: {body}"),
        )
    }
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    async fn get_by_id(&self, index: &str, id: &str) -> Result<Option<Value>, AdapterError> {
        let url = self.doc_url(index, Some(id));
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| AdapterError::search_index(None, e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from(response, "get").await);
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| AdapterError::search_index(None, e.to_string()))?;
        if json.get("found").and_then(Value::as_bool) == Some(false) {
            return Ok(None);
        }
        Ok(Some(
            json.get("_source")
                .cloned()
                .unwrap_or_else(|| Value::Object(Default::default())),
        ))
    }

    async fn create(&self, index: &str, document: Value) -> Result<(), AdapterError> {
        let url = self.doc_url(index, None);
        let response = self
            .authorize(self.client.post(&url))
            .json(&document)
            .send()
            .await
            .map_err(|e| AdapterError::search_index(None, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "create").await);
        }
        Ok(())
    }
}
