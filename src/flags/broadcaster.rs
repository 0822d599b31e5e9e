//! Fan-out of flag changes to streaming subscribers.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use crate::metrics;

use super::types::FlagSet;

/// Handle returned by [`Broadcaster::subscribe`], used to unsubscribe.
#[derive(Debug)]
pub struct SubscriptionHandle {
    id: u64,
}

/// Registry of connected streaming subscribers.
///
/// Subscribers may come and go from arbitrary connection-lifecycle tasks
/// while a publish is iterating the set; removal of dead sinks is deferred
/// until the iterator is released.
#[derive(Debug, Default)]
pub struct Broadcaster {
    subscribers: DashMap<u64, mpsc::UnboundedSender<FlagSet>>,
    next_id: AtomicU64,
}

impl Broadcaster {
    /// Create an empty broadcaster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber and deliver `current` to it immediately,
    /// so it does not wait for the next poll to learn the present state.
    pub fn subscribe(&self, current: FlagSet) -> (SubscriptionHandle, mpsc::UnboundedReceiver<FlagSet>) {
        let (tx, rx) = mpsc::unbounded_channel();
        // the receiver is still alive here, this send cannot fail
        let _ = tx.send(current);

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.insert(id, tx);

        debug!(id, subscribers = self.subscribers.len(), "subscriber added");
        metrics::inc_stream_connects();
        metrics::set_active_subscribers(self.subscribers.len());

        (SubscriptionHandle { id }, rx)
    }

    /// Remove a subscriber. Unsubscribing twice, or a sink already removed
    /// as dead, is a no-op.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) {
        if self.subscribers.remove(&handle.id).is_some() {
            debug!(id = handle.id, "subscriber removed");
            metrics::set_active_subscribers(self.subscribers.len());
        }
    }

    /// Push the flag set to every registered subscriber.
    ///
    /// A sink whose receiver is gone counts as disconnected: it is dropped
    /// from the set and delivery to the remaining sinks continues.
    pub fn publish(&self, flags: &FlagSet) {
        let mut dead = Vec::new();

        for entry in self.subscribers.iter() {
            if entry.value().send(flags.clone()).is_err() {
                dead.push(*entry.key());
            }
        }

        // removal happens after iteration so the shard locks are released
        for id in dead {
            self.subscribers.remove(&id);
            debug!(id, "dropped dead subscriber");
        }

        metrics::inc_broadcasts();
        metrics::set_active_subscribers(self.subscribers.len());
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
