//! TTL-aware response cache over a [`KeyValueStore`].

use color_eyre::{eyre::eyre, Report, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::traits::{CacheEntry, CacheMeta, Clock};
use crate::db::KeyValueStore;
use crate::telemetry::ErrorSink;

/// Prefix shared by every key the cache owns (entries and metadata).
pub const ENTRY_PREFIX: &str = "cache_";
const META_PREFIX: &str = "cache_meta_";

/// TTL applied when neither the caller nor the endpoint policy names one.
const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

fn entry_key(key: &str) -> String {
  format!("{}{}", ENTRY_PREFIX, key)
}

fn meta_key(key: &str) -> String {
  format!("{}{}", META_PREFIX, key)
}

/// Namespaced, TTL-bound cache.
///
/// No method returns an error: storage failures are reported to the error
/// sink and turned into a miss or a no-op, so an unavailable cache behaves
/// like an empty one.
pub struct CacheStore {
  storage: Arc<dyn KeyValueStore>,
  clock: Arc<dyn Clock>,
  sink: Arc<dyn ErrorSink>,
  default_ttl: Duration,
}

impl CacheStore {
  pub fn new(
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn ErrorSink>,
  ) -> Self {
    Self {
      storage,
      clock,
      sink,
      default_ttl: DEFAULT_TTL,
    }
  }

  /// Set the TTL used when `set` is called without one.
  pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
    self.default_ttl = ttl;
    self
  }

  /// Store `data` under `key`, then sweep expired entries.
  pub fn set<T: Serialize>(&self, key: &str, data: &T, ttl: Option<Duration>) {
    match self.try_set(key, data, ttl) {
      Ok(()) => {
        self.cleanup();
      }
      Err(e) => self.report(&e, "CacheStore.set", Some(key)),
    }
  }

  fn try_set<T: Serialize>(&self, key: &str, data: &T, ttl: Option<Duration>) -> Result<()> {
    let ttl = ttl.unwrap_or(self.default_ttl);
    let entry = CacheEntry {
      data,
      timestamp: self.clock.now_millis(),
      ttl: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
    };

    let entry_json =
      serde_json::to_string(&entry).map_err(|e| eyre!("Failed to serialize cache entry: {}", e))?;
    let meta_json = serde_json::to_string(&entry.meta())
      .map_err(|e| eyre!("Failed to serialize cache metadata: {}", e))?;

    self.storage.set_item(&entry_key(key), &entry_json)?;
    self.storage.set_item(&meta_key(key), &meta_json)?;

    Ok(())
  }

  /// Fetch a live entry. Expired entries are deleted and read as a miss.
  pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    self.try_get(key).unwrap_or_else(|e| {
      self.report(&e, "CacheStore.get", Some(key));
      None
    })
  }

  fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
    let Some(raw) = self.storage.get_item(&entry_key(key))? else {
      return Ok(None);
    };

    let entry: CacheEntry<T> =
      serde_json::from_str(&raw).map_err(|e| eyre!("Failed to parse cache entry: {}", e))?;

    if entry.meta().is_expired(self.clock.now_millis()) {
      debug!(key, "evicting expired cache entry");
      self.remove(key);
      return Ok(None);
    }

    Ok(Some(entry.data))
  }

  /// Delete an entry and its metadata. Missing keys are fine.
  pub fn remove(&self, key: &str) {
    let result = self
      .storage
      .remove_item(&entry_key(key))
      .and_then(|()| self.storage.remove_item(&meta_key(key)));

    if let Err(e) = result {
      self.report(&e, "CacheStore.remove", Some(key));
    }
  }

  /// Delete everything under the cache namespace.
  pub fn clear(&self) {
    let result = self
      .keys_with_prefix(ENTRY_PREFIX)
      .and_then(|keys| self.storage.multi_remove(&keys));

    if let Err(e) = result {
      self.report(&e, "CacheStore.clear", None);
    }
  }

  /// Remove every expired entry. Returns how many were removed.
  pub fn cleanup(&self) -> usize {
    let meta_keys = match self.keys_with_prefix(META_PREFIX) {
      Ok(keys) => keys,
      Err(e) => {
        self.report(&e, "CacheStore.cleanup", None);
        return 0;
      }
    };

    let now = self.clock.now_millis();
    let expired: Vec<&str> = meta_keys
      .iter()
      .filter(|meta_key| {
        // Unreadable metadata is skipped, not treated as expired
        self
          .storage
          .get_item(meta_key)
          .ok()
          .flatten()
          .and_then(|raw| serde_json::from_str::<CacheMeta>(&raw).ok())
          .is_some_and(|meta| meta.is_expired(now))
      })
      .filter_map(|meta_key| meta_key.strip_prefix(META_PREFIX))
      .collect();

    for key in &expired {
      self.remove(key);
    }

    if !expired.is_empty() {
      debug!(count = expired.len(), "removed expired cache entries");
    }
    expired.len()
  }

  /// Whether `key` is expired or unknown, judged from its metadata alone.
  pub fn is_expired(&self, key: &str) -> bool {
    let meta = self.storage.get_item(&meta_key(key)).and_then(|raw| {
      raw
        .map(|raw| serde_json::from_str::<CacheMeta>(&raw))
        .transpose()
        .map_err(|e| eyre!("Failed to parse cache metadata: {}", e))
    });

    match meta {
      Ok(Some(meta)) => meta.is_expired(self.clock.now_millis()),
      Ok(None) => true,
      Err(e) => {
        self.report(&e, "CacheStore.is_expired", Some(key));
        true
      }
    }
  }

  /// Serialized size of everything under the cache namespace, in bytes.
  ///
  /// Diagnostic only; nothing is evicted based on it.
  pub fn size_estimate(&self) -> u64 {
    let total = self.keys_with_prefix(ENTRY_PREFIX).and_then(|keys| {
      keys.iter().try_fold(0u64, |acc, key| {
        let len = self.storage.get_item(key)?.map_or(0, |v| v.len() as u64);
        Ok::<u64, Report>(acc + len)
      })
    });

    total.unwrap_or_else(|e| {
      self.report(&e, "CacheStore.size_estimate", None);
      0
    })
  }

  /// Raw storage keys owned by the cache, entries and metadata alike.
  pub fn storage_keys(&self) -> Vec<String> {
    self.keys_with_prefix(ENTRY_PREFIX).unwrap_or_else(|e| {
      self.report(&e, "CacheStore.storage_keys", None);
      Vec::new()
    })
  }

  fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
    Ok(
      self
        .storage
        .all_keys()?
        .into_iter()
        .filter(|k| k.starts_with(prefix))
        .collect(),
    )
  }

  fn report(&self, error: &Report, operation: &str, key: Option<&str>) {
    match key {
      Some(key) => self
        .sink
        .log_error(error, &[("context", operation), ("key", key)]),
      None => self.sink.log_error(error, &[("context", operation)]),
    }
  }
}
