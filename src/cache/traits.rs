//! Core traits and types for the caching system.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Source of "now" for expiry checks, in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
  fn now_millis(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now_millis(&self) -> i64 {
    Utc::now().timestamp_millis()
  }
}

/// A cached payload as persisted under `cache_<key>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
  /// The cached response data
  pub data: T,
  /// When the entry was written (ms since epoch)
  pub timestamp: i64,
  /// How long the entry stays valid (ms)
  pub ttl: u64,
}

/// Expiry bookkeeping persisted under `cache_meta_<key>`.
///
/// Duplicates the entry's timestamps so cleanup can scan without
/// deserializing payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMeta {
  pub timestamp: i64,
  pub ttl: u64,
}

impl CacheMeta {
  /// An entry is valid while `now - timestamp <= ttl`.
  pub fn is_expired(&self, now: i64) -> bool {
    let ttl = i64::try_from(self.ttl).unwrap_or(i64::MAX);
    now.saturating_sub(self.timestamp) > ttl
  }
}

impl<T> CacheEntry<T> {
  pub fn meta(&self) -> CacheMeta {
    CacheMeta {
      timestamp: self.timestamp,
      ttl: self.ttl,
    }
  }
}

#[cfg(test)]
pub mod testing {
  use super::Clock;
  use std::sync::atomic::{AtomicI64, Ordering};
  use std::time::Duration;

  /// Clock that only moves when told to.
  pub struct ManualClock {
    now: AtomicI64,
  }

  impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
      Self {
        now: AtomicI64::new(start_millis),
      }
    }

    pub fn advance(&self, by: Duration) {
      self.now.fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
  }

  impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
      self.now.load(Ordering::SeqCst)
    }
  }
}
