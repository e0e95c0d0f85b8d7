//! agify.io client (age by name)

use super::{lookup_json, AgeClient, ClientError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Response body of agify.io
#[derive(Debug, Deserialize)]
struct AgifyResponse {
    #[allow(dead_code)] // Echo of the queried name
    name: Option<String>,
    /// `null` when the name is unknown
    age: Option<u32>,
}

pub struct AgifyClient {
    http: Client,
    base_url: String,
}

impl AgifyClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AgeClient for AgifyClient {
    fn source(&self) -> &'static str {
        "agify"
    }

    async fn age_by_name(&self, name: &str) -> Result<Option<u32>, ClientError> {
        let response: AgifyResponse = lookup_json(&self.http, &self.base_url, name).await?;
        Ok(response.age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::build_http_client;
    use std::time::Duration;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> AgifyClient {
        let http = build_http_client(Duration::from_secs(2)).unwrap();
        AgifyClient::new(http, server.uri())
    }

    #[tokio::test]
    async fn test_age_extracted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("name", "Ivan"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "count": 12345, "name": "Ivan", "age": 51
            })))
            .mount(&server)
            .await;

        let age = client(&server).age_by_name("Ivan").await.unwrap();
        assert_eq!(age, Some(51));
    }

    #[tokio::test]
    async fn test_null_age_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "count": 0, "name": "Zzyzx", "age": null
            })))
            .mount(&server)
            .await;

        let age = client(&server).age_by_name("Zzyzx").await.unwrap();
        assert!(age.is_none());
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Request limit reached"))
            .mount(&server)
            .await;

        let err = client(&server).age_by_name("Ivan").await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client(&server).age_by_name("Ivan").await.unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[tokio::test]
    async fn test_name_is_url_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("name", "Anna Maria&x=1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Anna Maria&x=1", "age": 30
            })))
            .mount(&server)
            .await;

        let age = client(&server).age_by_name("Anna Maria&x=1").await.unwrap();
        assert_eq!(age, Some(30));
    }
}
