//! HTTP API handlers.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tracing::warn;

use crate::flags::{Broadcaster, FlagCache, FlagSet, SubscriptionHandle};
use crate::metrics;
use crate::utils::now_rfc3339;

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Last-known-good flag cache, written by the poller.
    pub cache: FlagCache,
    /// Registry of connected streaming subscribers.
    pub broadcaster: Arc<Broadcaster>,
}

impl AppState {
    /// Create app state with the startup default flag set.
    pub fn new() -> Self {
        Self {
            cache: FlagCache::new(FlagSet::default()),
            broadcaster: Arc::new(Broadcaster::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Greeting response.
#[derive(Debug, Serialize)]
pub struct GreetingResponse {
    /// Static greeting.
    pub message: &'static str,
    /// Current time, RFC 3339.
    pub timestamp: String,
    /// Crate version.
    pub version: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "healthy".
    pub status: &'static str,
}

/// Greeting handler.
pub async fn root() -> impl IntoResponse {
    Json(GreetingResponse {
        message: "Hello Kirk",
        timestamp: now_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "healthy" })
}

/// Current flags from the cache.
pub async fn get_flags(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.cache.get().await)
}

/// Unsubscribes the sink when the connection closes.
struct SubscriptionGuard {
    broadcaster: Arc<Broadcaster>,
    handle: SubscriptionHandle,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.broadcaster.unsubscribe(&self.handle);
        metrics::inc_stream_disconnects();
    }
}

/// Server-sent-event stream of flag changes.
///
/// The first event carries the state as of connection time; each broadcast
/// after that yields one more event.
pub async fn stream_flags(State(state): State<AppState>) -> impl IntoResponse {
    let current = state.cache.get().await;
    let (handle, mut rx) = state.broadcaster.subscribe(current);
    let guard = SubscriptionGuard {
        broadcaster: Arc::clone(&state.broadcaster),
        handle,
    };

    let stream = async_stream::stream! {
        // lives as long as the response body
        let _guard = guard;
        while let Some(flags) = rx.recv().await {
            match Event::default().json_data(&flags) {
                Ok(event) => yield Ok::<_, Infallible>(event),
                Err(err) => warn!(error = %err, "failed to encode flag event"),
            }
        }
    };

    (
        [(header::CONNECTION, "keep-alive")],
        Sse::new(stream).keep_alive(KeepAlive::default()),
    )
}
