//! Name-inference enrichment clients
//!
//! Three independent lookups, one per external source:
//! 1. **agify** - age by name
//! 2. **genderize** - gender by name
//! 3. **nationalize** - most probable nationality by name
//!
//! Each client issues one GET with a `name` query parameter and decodes a
//! JSON body. A client returns `Ok(None)` when the source has no answer and
//! a [`ClientError`] when the lookup itself broke. Callers treat both as "no
//! value"; an enrichment failure never aborts person creation.
//!
//! Lookups are plain futures: dropping one abandons the in-flight request,
//! and every `reqwest::Client` carries its own timeout.

pub mod agify;
pub mod genderize;
pub mod nationalize;

#[cfg(test)]
pub(crate) mod mock;

pub use agify::AgifyClient;
pub use genderize::GenderizeClient;
pub use nationalize::NationalizeClient;

use async_trait::async_trait;
use persons_common::config::EnrichmentConfig;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = concat!("persons-api/", env!("CARGO_PKG_VERSION"));

/// Enrichment client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Age-by-name lookup
#[async_trait]
pub trait AgeClient: Send + Sync {
    /// Source name for logs
    fn source(&self) -> &'static str;

    async fn age_by_name(&self, name: &str) -> Result<Option<u32>, ClientError>;
}

/// Gender-by-name lookup
#[async_trait]
pub trait GenderClient: Send + Sync {
    fn source(&self) -> &'static str;

    async fn gender_by_name(&self, name: &str) -> Result<Option<String>, ClientError>;
}

/// Nationality-by-name lookup
#[async_trait]
pub trait NationalityClient: Send + Sync {
    fn source(&self) -> &'static str;

    async fn nationality_by_name(&self, name: &str) -> Result<Option<String>, ClientError>;
}

/// The three enrichment sources used at person creation
#[derive(Clone)]
pub struct EnrichmentClients {
    pub age: Arc<dyn AgeClient>,
    pub gender: Arc<dyn GenderClient>,
    pub nationality: Arc<dyn NationalityClient>,
}

impl EnrichmentClients {
    /// Build the HTTP-backed clients from configuration
    pub fn from_config(config: &EnrichmentConfig) -> Result<Self, ClientError> {
        let http = build_http_client(config.timeout)?;

        Ok(Self {
            age: Arc::new(AgifyClient::new(http.clone(), &config.age_url)),
            gender: Arc::new(GenderizeClient::new(http.clone(), &config.gender_url)),
            nationality: Arc::new(NationalizeClient::new(http, &config.nationality_url)),
        })
    }
}

/// HTTP client shared by the enrichment sources
pub fn build_http_client(timeout: Duration) -> Result<Client, ClientError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| ClientError::Network(e.to_string()))
}

/// GET `<base_url>?name=<name>` and decode the JSON body
pub(crate) async fn lookup_json<T: DeserializeOwned>(
    http: &Client,
    base_url: &str,
    name: &str,
) -> Result<T, ClientError> {
    debug!(url = %base_url, name = %name, "Querying enrichment API");

    let response = http
        .get(base_url)
        .query(&[("name", name)])
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(format!("{}: {}", base_url, e))
            } else {
                ClientError::Network(format!("{}: {}", base_url, e))
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Parse(format!("{} response: {}", base_url, e)))
}
