//! Last-known-good flag cache.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::types::FlagSet;

/// Process-wide cache of the last successfully fetched flag state.
///
/// Single writer (the poller), any number of readers. Only the latest value
/// is kept.
#[derive(Debug, Clone, Default)]
pub struct FlagCache {
    inner: Arc<RwLock<FlagSet>>,
}

impl FlagCache {
    /// Create a cache holding the given initial value.
    pub fn new(initial: FlagSet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Return the current cached flag set.
    pub async fn get(&self) -> FlagSet {
        self.inner.read().await.clone()
    }

    /// Replace the cached flag set wholesale.
    pub async fn set(&self, next: FlagSet) {
        *self.inner.write().await = next;
    }
}
