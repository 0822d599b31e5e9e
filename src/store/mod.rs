//! Parameter store module.
//!
//! This module handles:
//! - The `ParameterStore` trait the poller fetches through
//! - The HTTP parameter store client
//! - Mock store for testing

pub mod client;
pub mod mock;

use async_trait::async_trait;

use crate::error::StoreError;

/// A remote key-value configuration service queried for flag values.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Fetch the raw string value of a named parameter.
    async fn fetch_parameter(&self, name: &str) -> Result<String, StoreError>;
}

pub use client::HttpParameterStore;
pub use mock::{MockConfig, MockParameterStore};
