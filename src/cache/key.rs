//! Cache key derivation.

use sha2::{Digest, Sha256};
use std::fmt;

/// Opaque identifier of one logical request.
///
/// Same method, endpoint and body always give the same key; changing any of
/// them gives a different one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
  pub fn derive(method: &str, endpoint: &str, body: Option<&str>) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update([0]);
    hasher.update(endpoint.as_bytes());
    hasher.update([0]);
    match body {
      Some(body) => {
        hasher.update([1]);
        hasher.update(body.as_bytes());
      }
      None => hasher.update([0]),
    }

    // SHA256 hash for stable, fixed-length keys
    Self(hex::encode(hasher.finalize()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for CacheKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
