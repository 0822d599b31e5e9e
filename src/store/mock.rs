//! Mock parameter store for unit testing.
//!
//! This module provides a mock store that can be used in tests
//! without making real network requests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::StoreError;

use super::ParameterStore;

/// Configuration for mock store behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Value to return for every fetch.
    pub value: String,
    /// Whether to fail fetches.
    pub fail_fetch: bool,
    /// Simulated latency in milliseconds.
    pub latency_ms: u64,
}

/// Mock parameter store for testing.
#[derive(Debug, Clone, Default)]
pub struct MockParameterStore {
    /// Mock configuration, swappable mid-test.
    config: Arc<Mutex<MockConfig>>,
    /// Number of fetches performed.
    fetch_count: Arc<AtomicU64>,
}

impl MockParameterStore {
    /// Create a new mock store returning the given value.
    pub fn new(value: impl Into<String>) -> Self {
        Self::with_config(MockConfig {
            value: value.into(),
            ..MockConfig::default()
        })
    }

    /// Create a mock store with custom configuration.
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config: Arc::new(Mutex::new(config)),
            fetch_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Set the value returned by subsequent fetches.
    pub fn set_value(&self, value: impl Into<String>) {
        let mut config = self.config.lock().unwrap();
        config.value = value.into();
        config.fail_fetch = false;
    }

    /// Make subsequent fetches fail.
    pub fn set_failing(&self, failing: bool) {
        self.config.lock().unwrap().fail_fetch = failing;
    }

    /// Number of fetches performed so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ParameterStore for MockParameterStore {
    async fn fetch_parameter(&self, name: &str) -> Result<String, StoreError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        let config = self.config.lock().unwrap().clone();

        if config.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(config.latency_ms)).await;
        }

        if config.fail_fetch {
            return Err(StoreError::MissingValue {
                name: name.to_string(),
            });
        }

        Ok(config.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_store_returns_value() {
        let store = MockParameterStore::new("true");

        let value = store.fetch_parameter("fear").await.unwrap();
        assert_eq!(value, "true");
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn mock_store_value_can_change_mid_test() {
        let store = MockParameterStore::new("true");
        store.set_value("false");

        let value = store.fetch_parameter("fear").await.unwrap();
        assert_eq!(value, "false");
    }

    #[tokio::test]
    async fn mock_store_failure_mode() {
        let store = MockParameterStore::new("true");
        store.set_failing(true);

        let result = store.fetch_parameter("fear").await;
        assert!(result.is_err());
        assert_eq!(store.fetch_count(), 1);
    }
}
