//! genderize.io client (gender by name)

use super::{lookup_json, ClientError, GenderClient};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct GenderizeResponse {
    /// Free-form label, `null` when the name is unknown
    gender: Option<String>,
    #[allow(dead_code)] // Not stored
    probability: Option<f64>,
}

pub struct GenderizeClient {
    http: Client,
    base_url: String,
}

impl GenderizeClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl GenderClient for GenderizeClient {
    fn source(&self) -> &'static str {
        "genderize"
    }

    async fn gender_by_name(&self, name: &str) -> Result<Option<String>, ClientError> {
        let response: GenderizeResponse = lookup_json(&self.http, &self.base_url, name).await?;
        Ok(response.gender)
    }
}
