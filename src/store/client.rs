//! HTTP parameter store client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::StoreError;

use super::ParameterStore;

/// Parameter store client over plain HTTP.
#[derive(Debug, Clone)]
pub struct HttpParameterStore {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL of the store endpoint.
    base_url: String,
    /// Region sent with every request.
    region: String,
}

/// Parameter response from the store API.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterResponse {
    /// The parameter envelope.
    pub parameter: Option<ParameterInfo>,
}

/// Single parameter in a store response.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterInfo {
    /// Parameter name.
    pub name: Option<String>,
    /// Parameter value.
    pub value: Option<String>,
}

impl HttpParameterStore {
    /// Create a new store client from config with tuned HTTP settings.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(std::time::Duration::from_millis(500))
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .pool_max_idle_per_host(config.http_pool_size)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            base_url: config.parameter_store_url.trim_end_matches('/').to_string(),
            region: config.parameter_store_region.clone(),
        }
    }

    /// Get the HTTP client reference.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Get the store base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the configured region.
    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl ParameterStore for HttpParameterStore {
    #[instrument(skip(self), fields(name = %name))]
    async fn fetch_parameter(&self, name: &str) -> Result<String, StoreError> {
        let url = format!("{}/parameters/{}", self.base_url, name);

        let response = self
            .http
            .get(&url)
            .query(&[("region", self.region.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::BadStatus {
                name: name.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body: ParameterResponse = response.json().await.map_err(|e| {
            StoreError::ParseError(format!("Failed to parse parameter response: {}", e))
        })?;

        let value = body
            .parameter
            .and_then(|p| p.value)
            .ok_or_else(|| StoreError::MissingValue {
                name: name.to_string(),
            })?;

        debug!(value = %value, "Fetched parameter");

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation_works() {
        let config = Config::default();
        let store = HttpParameterStore::new(&config);
        assert_eq!(store.region(), "us-east-1");
        assert_eq!(store.base_url(), "http://localhost:4566");
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let config = Config {
            parameter_store_url: "http://store.internal/".to_string(),
            ..Config::default()
        };
        let store = HttpParameterStore::new(&config);
        assert_eq!(store.base_url(), "http://store.internal");
    }

    #[test]
    fn parameter_response_parses_nested_value() {
        let raw = r#"{"parameter": {"name": "fear", "value": "true"}}"#;
        let parsed: ParameterResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.parameter.unwrap().value.as_deref(), Some("true"));
    }

    #[test]
    fn parameter_response_tolerates_missing_fields() {
        let raw = r#"{"parameter": {"name": "fear"}}"#;
        let parsed: ParameterResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.parameter.unwrap().value.is_none());
    }
}
