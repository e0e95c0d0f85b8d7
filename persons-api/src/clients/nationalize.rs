//! nationalize.io client (nationality by name)
//!
//! The source answers with a ranked list of `(country_id, probability)`
//! candidates. The client keeps the most probable one; among equal
//! probabilities the first candidate in response order wins.

use super::{lookup_json, ClientError, NationalityClient};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct NationalizeResponse {
    #[serde(default)]
    country: Vec<CountryCandidate>,
}

/// One nationality candidate
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CountryCandidate {
    pub country_id: String,
    pub probability: f64,
}

/// Highest-probability candidate, first occurrence on ties
///
/// Only a strictly greater probability replaces the running maximum, so a
/// later candidate with an equal (or NaN) probability never wins.
pub fn most_probable(candidates: &[CountryCandidate]) -> Option<&CountryCandidate> {
    let mut best: Option<&CountryCandidate> = None;
    for candidate in candidates {
        if candidate.probability.is_nan() {
            continue;
        }
        let better = best.map_or(true, |current| candidate.probability > current.probability);
        if better {
            best = Some(candidate);
        }
    }
    best
}

pub struct NationalizeClient {
    http: Client,
    base_url: String,
}

impl NationalizeClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl NationalityClient for NationalizeClient {
    fn source(&self) -> &'static str {
        "nationalize"
    }

    async fn nationality_by_name(&self, name: &str) -> Result<Option<String>, ClientError> {
        let response: NationalizeResponse = lookup_json(&self.http, &self.base_url, name).await?;
        Ok(most_probable(&response.country).map(|c| c.country_id.clone()))
    }
}
