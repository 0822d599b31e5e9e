//! Flag distribution module.
//!
//! This module handles:
//! - The `FlagSet` domain type and upstream value coercion
//! - The last-known-good flag cache
//! - The fixed-interval parameter store poller
//! - Fan-out of flag changes to streaming subscribers

pub mod broadcaster;
pub mod cache;
pub mod poller;
pub mod types;

pub use broadcaster::{Broadcaster, SubscriptionHandle};
pub use cache::FlagCache;
pub use poller::Poller;
pub use types::{flag_value, FlagSet};
