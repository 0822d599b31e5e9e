//! Fixed-interval parameter store poller.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::metrics;
use crate::store::ParameterStore;

use super::broadcaster::Broadcaster;
use super::cache::FlagCache;
use super::types::{flag_value, FlagSet};

/// Polls the parameter store and feeds the cache and broadcaster.
///
/// The loop fetches once at startup, then on every tick. Cycles are
/// serialized: the next tick is not taken until the previous fetch has
/// completed.
#[derive(Debug)]
pub struct Poller<S> {
    store: S,
    cache: FlagCache,
    broadcaster: Arc<Broadcaster>,
    parameter: String,
    period: Duration,
}

impl<S: ParameterStore> Poller<S> {
    /// Create a poller from config.
    pub fn new(store: S, cache: FlagCache, broadcaster: Arc<Broadcaster>, config: &Config) -> Self {
        Self {
            store,
            cache,
            broadcaster,
            parameter: config.flag_parameter.clone(),
            period: Duration::from_secs(config.poll_interval_seconds),
        }
    }

    /// Run until the token is cancelled.
    pub async fn run(self, cancel: CancellationToken) {
        info!(
            parameter = %self.parameter,
            period_s = self.period.as_secs(),
            "flag poller started"
        );

        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately: the initial fetch-and-populate
        ticker.tick().await;
        self.poll_once().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("flag poller stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.poll_once().await;
                }
            }
        }
    }

    /// One fetch-compare-publish cycle.
    ///
    /// Cache update strictly precedes the broadcast, and a fetch failure
    /// leaves the cache untouched.
    pub async fn poll_once(&self) {
        metrics::inc_polls();

        match self.store.fetch_parameter(&self.parameter).await {
            Ok(raw) => {
                let fear = flag_value(&raw);
                let current = self.cache.get().await;

                if current.fear != fear {
                    let next = FlagSet::new(fear);
                    info!(fear, "flag changed, broadcasting");
                    self.cache.set(next.clone()).await;
                    self.broadcaster.publish(&next);
                    metrics::inc_flag_changes();
                } else if current.timestamp.is_none() {
                    // first successful fetch stamps the startup default
                    self.cache.set(FlagSet::new(fear)).await;
                }
            }
            Err(err) => {
                metrics::inc_poll_failures();
                warn!(error = %err, "flag fetch failed, keeping cached value");
            }
        }
    }
}
