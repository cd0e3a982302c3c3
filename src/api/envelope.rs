//! Request options and the uniform response envelope.

use serde::Serialize;
use std::borrow::Cow;
use std::time::Duration;

/// Error code for "offline and nothing cached".
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
/// Error code for a 2xx reply whose payload does not match the expected type.
pub const INVALID_RESPONSE: &str = "INVALID_RESPONSE";

/// What every client call resolves to. Never an `Err`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
  pub success: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data: Option<T>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  /// Set when `data` was not fetched during this call
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub from_cache: bool,
}

impl<T> ApiResponse<T> {
  pub fn ok(message: impl Into<String>, data: T) -> Self {
    Self {
      success: true,
      message: message.into(),
      data: Some(data),
      error: None,
      from_cache: false,
    }
  }

  pub fn cached(message: impl Into<String>, data: T) -> Self {
    Self {
      from_cache: true,
      ..Self::ok(message, data)
    }
  }

  pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
    Self {
      success: false,
      message: message.into(),
      data: None,
      error: Some(error.into()),
      from_cache: false,
    }
  }

  pub fn is_network_error(&self) -> bool {
    self.error.as_deref() == Some(NETWORK_ERROR)
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
  #[default]
  Get,
  Post,
  Put,
  Patch,
  Delete,
}

impl Method {
  pub fn as_str(self) -> &'static str {
    match self {
      Method::Get => "GET",
      Method::Post => "POST",
      Method::Put => "PUT",
      Method::Patch => "PATCH",
      Method::Delete => "DELETE",
    }
  }
}

impl From<Method> for reqwest::Method {
  fn from(method: Method) -> Self {
    match method {
      Method::Get => reqwest::Method::GET,
      Method::Post => reqwest::Method::POST,
      Method::Put => reqwest::Method::PUT,
      Method::Patch => reqwest::Method::PATCH,
      Method::Delete => reqwest::Method::DELETE,
    }
  }
}

/// Pre-serialized request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
  Json(String),
  /// Sent as a multipart form with a single `image` field
  Image { file_name: String, bytes: Vec<u8> },
}

impl Body {
  pub fn json<T: Serialize>(value: &T) -> serde_json::Result<Self> {
    serde_json::to_string(value).map(Body::Json)
  }

  /// Stable text standing in for the body in cache keys.
  pub fn cache_repr(&self) -> Cow<'_, str> {
    match self {
      Body::Json(json) => Cow::Borrowed(json),
      Body::Image { file_name, bytes } => Cow::Owned(format!("image:{}:{}", file_name, bytes.len())),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
  /// `None` means GET
  pub method: Option<Method>,
  pub headers: Vec<(String, String)>,
  pub body: Option<Body>,
}

impl RequestOptions {
  pub fn get() -> Self {
    Self::default()
  }

  pub fn new(method: Method) -> Self {
    Self {
      method: Some(method),
      ..Self::default()
    }
  }

  pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.headers.push((name.into(), value.into()));
    self
  }

  pub fn body(mut self, body: Body) -> Self {
    self.body = Some(body);
    self
  }

  pub fn method(&self) -> Method {
    self.method.unwrap_or_default()
  }
}

/// Per-call cache settings.
///
/// Only GET requests are ever read from or written to the cache; for other
/// methods this is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
  /// Falls back to the cache store's default TTL
  pub ttl: Option<Duration>,
  pub use_cache: bool,
}

impl Default for CachePolicy {
  fn default() -> Self {
    Self {
      ttl: None,
      use_cache: true,
    }
  }
}

impl CachePolicy {
  pub fn ttl(ttl: Duration) -> Self {
    Self {
      ttl: Some(ttl),
      use_cache: true,
    }
  }

  pub fn no_cache() -> Self {
    Self {
      ttl: None,
      use_cache: false,
    }
  }
}
