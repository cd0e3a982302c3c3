//! Response caching for offline support.
//!
//! This module provides the TTL-bound cache used by the API client:
//! - Stores timestamped entries under a `cache_` namespace in durable storage
//! - Evicts expired entries lazily on read and opportunistically after writes
//! - Derives opaque, deterministic keys from method, endpoint and body

mod key;
mod store;
mod traits;

pub use key::CacheKey;
pub use store::CacheStore;
pub use traits::SystemClock;

#[cfg(test)]
pub use traits::testing::ManualClock;
