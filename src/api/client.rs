//! Request engine. Every outbound call goes through [`ApiClient::request`],
//! which decides between network, cache and failure.

use color_eyre::{eyre::eyre, Report, Result};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::envelope::{
  ApiResponse, Body, CachePolicy, Method, RequestOptions, INVALID_RESPONSE, NETWORK_ERROR,
};
use crate::cache::{CacheKey, CacheStore};
use crate::db::KeyValueStore;
use crate::network::NetworkObserver;
use crate::telemetry::ErrorSink;

/// Storage key of the persisted bearer token.
pub const AUTH_TOKEN_KEY: &str = "authToken";

const IMAGE_MIME: &str = "image/jpeg";
const BREADCRUMB_CATEGORY: &str = "API_CACHE";

const OFFLINE_CACHE_MESSAGE: &str = "Data retrieved from cache (offline)";
const OFFLINE_MISS_MESSAGE: &str = "No internet connection and no cached data available";
const FALLBACK_CACHE_MESSAGE: &str = "Data retrieved from cache (network error)";

/// Cache diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
  pub size_bytes: u64,
  pub keys: Vec<String>,
}

/// API client with offline support.
///
/// Owns the auth token. The cache store and network observer are shared
/// with the rest of the process and handed in by the caller.
pub struct ApiClient {
  base_url: Url,
  http: reqwest::Client,
  storage: Arc<dyn KeyValueStore>,
  cache: Arc<CacheStore>,
  network: Arc<NetworkObserver>,
  sink: Arc<dyn ErrorSink>,
  token: RwLock<Option<String>>,
}

impl ApiClient {
  pub fn new(
    base_url: Url,
    timeout: Duration,
    storage: Arc<dyn KeyValueStore>,
    cache: Arc<CacheStore>,
    network: Arc<NetworkObserver>,
    sink: Arc<dyn ErrorSink>,
  ) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      base_url,
      http,
      storage,
      cache,
      network,
      sink,
      token: RwLock::new(None),
    })
  }

  pub fn cache(&self) -> &CacheStore {
    &self.cache
  }

  // ==========================================================================
  // Token management
  // ==========================================================================

  /// Load a previously persisted token.
  pub fn initialize(&self) {
    match self.storage.get_item(AUTH_TOKEN_KEY) {
      Ok(token) => *self.token.write().unwrap_or_else(PoisonError::into_inner) = token,
      Err(e) => self
        .sink
        .log_error(&e, &[("context", "ApiClient.initialize")]),
    }
  }

  pub fn set_token(&self, token: &str) {
    *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    if let Err(e) = self.storage.set_item(AUTH_TOKEN_KEY, token) {
      self.sink.log_error(&e, &[("context", "ApiClient.setToken")]);
    }
  }

  pub fn clear_token(&self) {
    *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    if let Err(e) = self.storage.remove_item(AUTH_TOKEN_KEY) {
      self.sink.log_error(&e, &[("context", "ApiClient.clearToken")]);
    }
  }

  pub fn token(&self) -> Option<String> {
    self
      .token
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  pub fn is_authenticated(&self) -> bool {
    self.token().is_some()
  }

  /// Forget the token and drop every cached response, so nothing fetched
  /// for this user is served to the next one.
  pub fn logout(&self) {
    self.clear_token();
    self.cache.clear();
  }

  // ==========================================================================
  // Cache helpers
  // ==========================================================================

  pub fn cache_key(endpoint: &str, options: &RequestOptions) -> CacheKey {
    let body = options.body.as_ref().map(Body::cache_repr);
    CacheKey::derive(options.method().as_str(), endpoint, body.as_deref())
  }

  /// Drop the cached response of one logical request.
  pub fn clear_cache(&self, endpoint: &str, options: &RequestOptions) {
    self
      .cache
      .remove(Self::cache_key(endpoint, options).as_str());
  }

  pub fn cache_info(&self) -> CacheInfo {
    CacheInfo {
      size_bytes: self.cache.size_estimate(),
      keys: self.cache.storage_keys(),
    }
  }

  // ==========================================================================
  // Requests
  // ==========================================================================

  /// Entry point for endpoints without a typed wrapper.
  pub async fn make_request<T>(
    &self,
    endpoint: &str,
    options: RequestOptions,
    policy: CachePolicy,
  ) -> ApiResponse<T>
  where
    T: Serialize + DeserializeOwned,
  {
    self.request(endpoint, options, policy).await
  }

  /// Perform a request against `endpoint` (a path such as `/api/faqs`).
  ///
  /// 1. Offline (no link or no reachability) GET: serve from cache or fail
  ///    with `NETWORK_ERROR`, without touching the network
  /// 2. Otherwise send the request
  /// 3. Non-2xx replies are returned as failures; the cache is not consulted
  /// 4. Transport errors fall back to cache for GETs
  /// 5. 2xx GET replies are written through to the cache
  pub async fn request<T>(
    &self,
    endpoint: &str,
    options: RequestOptions,
    policy: CachePolicy,
  ) -> ApiResponse<T>
  where
    T: Serialize + DeserializeOwned,
  {
    let method = options.method();
    let cache_key = Self::cache_key(endpoint, &options);
    let cacheable = method == Method::Get && policy.use_cache;

    let network = self.network.probe().await;

    if !network.is_online() && cacheable {
      return match self.cache.get::<T>(cache_key.as_str()) {
        Some(data) => {
          self.breadcrumb("API_CACHE_HIT", endpoint, "Offline cache used");
          ApiResponse::cached(OFFLINE_CACHE_MESSAGE, data)
        }
        None => {
          debug!(endpoint, "offline with nothing cached");
          ApiResponse::failure(OFFLINE_MISS_MESSAGE, NETWORK_ERROR)
        }
      };
    }

    let (status, mut payload) = match self.send(method, endpoint, options).await {
      Ok(reply) => reply,
      Err(e) => return self.transport_failure(endpoint, &cache_key, cacheable, &e),
    };

    if !status.is_success() {
      return self.http_failure(endpoint, status, &payload);
    }

    let message = payload_str(&payload, "message")
      .unwrap_or("Success")
      .to_string();

    // Unwrap the `data` field when the server uses one
    let data = if payload.get("data").is_some_and(|d| !d.is_null()) {
      payload["data"].take()
    } else {
      payload
    };

    let data: T = match serde_json::from_value(data) {
      Ok(data) => data,
      Err(e) => {
        self.sink.log_error(
          &e,
          &[
            ("context", "ApiClient.request"),
            ("endpoint", endpoint),
            ("errorType", INVALID_RESPONSE),
          ],
        );
        return ApiResponse::failure("Unexpected response format", INVALID_RESPONSE);
      }
    };

    if cacheable && network.is_connected {
      self.cache.set(cache_key.as_str(), &data, policy.ttl);
      self.breadcrumb("API_CACHE_SET", endpoint, "Data cached");
    }

    ApiResponse::ok(message, data)
  }

  async fn send(
    &self,
    method: Method,
    endpoint: &str,
    options: RequestOptions,
  ) -> Result<(StatusCode, Value)> {
    let url = self.endpoint_url(endpoint)?;
    let RequestOptions { headers, body, .. } = options;

    let mut request = self.http.request(method.into(), url);
    for (name, value) in self.build_headers(headers, body.as_ref()) {
      request = request.header(name, value);
    }

    request = match body {
      None => request,
      Some(Body::Json(json)) => request.body(json),
      Some(Body::Image { file_name, bytes }) => {
        let part = Part::bytes(bytes)
          .file_name(file_name)
          .mime_str(IMAGE_MIME)
          .map_err(|e| eyre!("Failed to build image upload: {}", e))?;
        request.multipart(Form::new().part("image", part))
      }
    };

    let response = request.send().await.map_err(|e| eyre!("{}", e))?;
    let status = response.status();
    let bytes = response
      .bytes()
      .await
      .map_err(|e| eyre!("Failed to read response body: {}", e))?;

    let payload = if bytes.is_empty() {
      Value::Null
    } else {
      match serde_json::from_slice(&bytes) {
        Ok(payload) => payload,
        // An error page is still an authoritative HTTP failure
        Err(_) if !status.is_success() => Value::Null,
        Err(e) => return Err(eyre!("Invalid JSON response: {}", e)),
      }
    };

    Ok((status, payload))
  }

  fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
    if !endpoint.starts_with('/') {
      return Err(eyre!("Endpoint must be a path starting with '/': {}", endpoint));
    }

    let base = self.base_url.as_str().trim_end_matches('/');
    Url::parse(&format!("{}{}", base, endpoint))
      .map_err(|e| eyre!("Invalid endpoint {}: {}", endpoint, e))
  }

  /// JSON content type by default, caller headers on top, then the token.
  fn build_headers(
    &self,
    caller: Vec<(String, String)>,
    body: Option<&Body>,
  ) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    // Multipart bodies carry their own content type with the boundary
    if !matches!(body, Some(Body::Image { .. })) {
      headers.insert("content-type".to_string(), "application/json".to_string());
    }

    for (name, value) in caller {
      headers.insert(name.to_ascii_lowercase(), value);
    }

    if let Some(token) = self.token() {
      headers.insert("authorization".to_string(), format!("Bearer {}", token));
    }

    headers
  }

  fn transport_failure<T: DeserializeOwned>(
    &self,
    endpoint: &str,
    cache_key: &CacheKey,
    cacheable: bool,
    error: &Report,
  ) -> ApiResponse<T> {
    if cacheable {
      if let Some(data) = self.cache.get::<T>(cache_key.as_str()) {
        self.breadcrumb("API_CACHE_FALLBACK", endpoint, "Network error, using cache");
        return ApiResponse::cached(FALLBACK_CACHE_MESSAGE, data);
      }
    }

    warn!(endpoint, error = %error, "request failed");
    self.sink.log_error(
      error,
      &[
        ("context", "ApiClient.request"),
        ("endpoint", endpoint),
        ("errorType", NETWORK_ERROR),
      ],
    );

    ApiResponse::failure("Network error", error.to_string())
  }

  fn http_failure<T>(&self, endpoint: &str, status: StatusCode, payload: &Value) -> ApiResponse<T> {
    let server_message = payload_str(payload, "message");
    let status_code = status.as_u16().to_string();

    self.sink.log_error(
      &format!(
        "API Error: {} - {}",
        status_code,
        server_message.unwrap_or("Unknown error")
      ),
      &[
        ("context", "ApiClient.request"),
        ("endpoint", endpoint),
        ("status", status_code.as_str()),
      ],
    );

    ApiResponse::failure(
      server_message.unwrap_or("Request failed"),
      payload_str(payload, "error").unwrap_or("Unknown error"),
    )
  }

  fn breadcrumb(&self, action: &str, endpoint: &str, details: &str) {
    self.sink.log_breadcrumb(
      &format!("{} on {} - {}", action, endpoint, details),
      BREADCRUMB_CATEGORY,
    );
  }
}

/// Non-empty string field of a JSON object.
fn payload_str<'a>(payload: &'a Value, field: &str) -> Option<&'a str> {
  payload
    .get(field)
    .and_then(Value::as_str)
    .filter(|s| !s.is_empty())
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::cache::ManualClock;
  use crate::db::MemoryStore;
  use crate::network::{NetworkState, StaticProbe};
  use crate::telemetry::testing::RecordingSink;
  use serde_json::json;
  use wiremock::matchers::{header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  pub(crate) struct Harness {
    pub client: ApiClient,
    pub storage: Arc<MemoryStore>,
    pub probe: Arc<StaticProbe>,
    pub clock: Arc<ManualClock>,
    pub sink: Arc<RecordingSink>,
  }

  pub(crate) fn harness(base_url: &str) -> Harness {
    let storage = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let sink = Arc::new(RecordingSink::default());
    let probe = Arc::new(StaticProbe::new(NetworkState::online()));

    let cache = Arc::new(CacheStore::new(storage.clone(), clock.clone(), sink.clone()));
    let network = Arc::new(NetworkObserver::new(probe.clone()));
    let client = ApiClient::new(
      Url::parse(base_url).unwrap(),
      Duration::from_secs(5),
      storage.clone(),
      cache,
      network,
      sink.clone(),
    )
    .unwrap();

    Harness {
      client,
      storage,
      probe,
      clock,
      sink,
    }
  }

  /// Base URL nothing listens on.
  const DEAD_URL: &str = "http://127.0.0.1:1";

  async fn get(h: &Harness, endpoint: &str) -> ApiResponse<Value> {
    h.client
      .request(endpoint, RequestOptions::get(), CachePolicy::default())
      .await
  }

  #[tokio::test]
  async fn test_online_get_unwraps_data_and_caches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api/faqs"))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(json!({"message": "FAQs fetched", "data": [{"id": "f1"}]})),
      )
      .expect(1)
      .mount(&server)
      .await;

    let h = harness(&server.uri());
    let response = get(&h, "/api/faqs").await;

    assert!(response.success);
    assert!(!response.from_cache);
    assert_eq!(response.message, "FAQs fetched");
    assert_eq!(response.data, Some(json!([{"id": "f1"}])));

    let key = ApiClient::cache_key("/api/faqs", &RequestOptions::get());
    assert_eq!(h.client.cache().get::<Value>(key.as_str()), Some(json!([{"id": "f1"}])));
    assert!(h.sink.has_breadcrumb("API_CACHE_SET"));
  }

  #[tokio::test]
  async fn test_payload_without_data_field_is_returned_whole() {
    let server = MockServer::start().await;
    Mock::given(path("/api/footer"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "hi@cready.in"})))
      .mount(&server)
      .await;

    let h = harness(&server.uri());
    let response = get(&h, "/api/footer").await;
    assert_eq!(response.message, "Success");
    assert_eq!(response.data, Some(json!({"email": "hi@cready.in"})));
  }

  #[tokio::test]
  async fn test_offline_hit_serves_cache() {
    let server = MockServer::start().await;
    Mock::given(path("/api/partners"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": "p1"}]})))
      .expect(1)
      .mount(&server)
      .await;

    let h = harness(&server.uri());
    get(&h, "/api/partners").await;

    h.probe.set(NetworkState::offline());
    let response = get(&h, "/api/partners").await;

    assert!(response.success);
    assert!(response.from_cache);
    assert_eq!(response.message, OFFLINE_CACHE_MESSAGE);
    assert_eq!(response.data, Some(json!([{"id": "p1"}])));
    assert!(h.sink.has_breadcrumb("API_CACHE_HIT"));
  }

  #[tokio::test]
  async fn test_offline_miss_makes_no_network_call() {
    let server = MockServer::start().await;
    Mock::given(path("/api/faqs"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
      .expect(0)
      .mount(&server)
      .await;

    let h = harness(&server.uri());
    h.probe.set(NetworkState::offline());
    let response = get(&h, "/api/faqs").await;

    assert!(!response.success);
    assert!(response.is_network_error());
    assert_eq!(response.message, OFFLINE_MISS_MESSAGE);
    assert!(response.data.is_none());
  }

  #[tokio::test]
  async fn test_degraded_network_is_treated_as_offline() {
    let server = MockServer::start().await;
    Mock::given(path("/api/footer"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "ft"}})))
      .expect(1)
      .mount(&server)
      .await;

    let h = harness(&server.uri());
    get(&h, "/api/footer").await;

    h.probe.set(NetworkState::degraded());
    let cached = get(&h, "/api/footer").await;
    assert!(cached.from_cache);

    let missing = get(&h, "/api/faqs").await;
    assert!(missing.is_network_error());
  }

  #[tokio::test]
  async fn test_http_error_is_authoritative() {
    let server = MockServer::start().await;
    Mock::given(path("/api/users/profile"))
      .respond_with(
        ResponseTemplate::new(500)
          .set_body_json(json!({"message": "Database down", "error": "DB_ERROR"})),
      )
      .mount(&server)
      .await;

    let h = harness(&server.uri());
    let key = ApiClient::cache_key("/api/users/profile", &RequestOptions::get());
    h.client.cache().set(key.as_str(), &json!({"id": "stale"}), None);

    let response = get(&h, "/api/users/profile").await;

    assert!(!response.success);
    assert!(!response.from_cache);
    assert_eq!(response.message, "Database down");
    assert_eq!(response.error.as_deref(), Some("DB_ERROR"));
    assert_eq!(h.sink.last_context("status").as_deref(), Some("500"));
    assert_eq!(h.sink.last_context("endpoint").as_deref(), Some("/api/users/profile"));
    // The stale entry is neither served nor replaced
    assert_eq!(h.client.cache().get::<Value>(key.as_str()), Some(json!({"id": "stale"})));
  }

  #[tokio::test]
  async fn test_http_error_writes_nothing_and_uses_defaults() {
    let server = MockServer::start().await;
    Mock::given(path("/api/faqs"))
      .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
      .mount(&server)
      .await;

    let h = harness(&server.uri());
    let response = get(&h, "/api/faqs").await;

    assert!(!response.success);
    assert_eq!(response.message, "Request failed");
    assert_eq!(response.error.as_deref(), Some("Unknown error"));
    assert!(h.client.cache_info().keys.is_empty());
  }

  #[tokio::test]
  async fn test_transport_error_falls_back_to_cache() {
    let h = harness(DEAD_URL);
    let key = ApiClient::cache_key("/api/partners", &RequestOptions::get());
    h.client.cache().set(key.as_str(), &json!([{"id": "p1"}]), None);

    let response = get(&h, "/api/partners").await;

    assert!(response.success);
    assert!(response.from_cache);
    assert_eq!(response.message, FALLBACK_CACHE_MESSAGE);
    assert!(h.sink.has_breadcrumb("API_CACHE_FALLBACK"));
    assert_eq!(h.sink.error_count(), 0);
  }

  #[tokio::test]
  async fn test_transport_error_without_cache() {
    let h = harness(DEAD_URL);
    let response = get(&h, "/api/partners").await;

    assert!(!response.success);
    assert_eq!(response.message, "Network error");
    assert!(response.error.is_some());
    assert_eq!(h.sink.last_context("errorType").as_deref(), Some(NETWORK_ERROR));
  }

  #[tokio::test]
  async fn test_expired_cache_is_not_a_fallback() {
    let h = harness(DEAD_URL);
    let key = ApiClient::cache_key("/api/partners", &RequestOptions::get());
    h.client
      .cache()
      .set(key.as_str(), &json!([]), Some(Duration::from_secs(1)));
    h.clock.advance(Duration::from_secs(2));

    let response = get(&h, "/api/partners").await;
    assert!(!response.success);
    assert_eq!(response.message, "Network error");
  }

  #[tokio::test]
  async fn test_headers_include_json_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api/users/profile"))
      .and(header("content-type", "application/json"))
      .and(header("authorization", "Bearer secret"))
      .and(header("x-app-version", "1.0"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "u1"}})))
      .expect(1)
      .mount(&server)
      .await;

    let h = harness(&server.uri());
    h.client.set_token("secret");

    let response: ApiResponse<Value> = h
      .client
      .request(
        "/api/users/profile",
        RequestOptions::get().header("X-App-Version", "1.0"),
        CachePolicy::no_cache(),
      )
      .await;
    assert!(response.success);
  }

  #[tokio::test]
  async fn test_mutating_and_opted_out_requests_are_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/api/submit"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": true}})))
      .mount(&server)
      .await;
    Mock::given(method("GET"))
      .and(path("/api/faqs"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
      .mount(&server)
      .await;

    let h = harness(&server.uri());
    let post: ApiResponse<Value> = h
      .client
      .request(
        "/api/submit",
        RequestOptions::new(Method::Post).body(Body::Json("{}".to_string())),
        CachePolicy::ttl(Duration::from_secs(900)),
      )
      .await;
    assert!(post.success);

    let get: ApiResponse<Value> = h
      .client
      .request("/api/faqs", RequestOptions::get(), CachePolicy::no_cache())
      .await;
    assert!(get.success);

    assert!(h.client.cache_info().keys.is_empty());
  }

  #[tokio::test]
  async fn test_type_mismatch_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(path("/api/faqs"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "not a list"})))
      .mount(&server)
      .await;

    let h = harness(&server.uri());
    let response: ApiResponse<Vec<Value>> = h
      .client
      .request("/api/faqs", RequestOptions::get(), CachePolicy::default())
      .await;

    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some(INVALID_RESPONSE));
    assert!(h.client.cache_info().keys.is_empty());
  }

  #[tokio::test]
  async fn test_relative_endpoint_is_rejected() {
    let server = MockServer::start().await;
    let h = harness(&server.uri());
    let response = get(&h, "api/faqs").await;
    assert!(!response.success);
    assert!(response.error.unwrap().contains("must be a path"));
  }

  #[test]
  fn test_endpoint_url_appends_to_base_path() {
    let h = harness("https://cready.in/v1/");
    assert_eq!(
      h.client.endpoint_url("/api/faqs?active=true").unwrap().as_str(),
      "https://cready.in/v1/api/faqs?active=true"
    );
  }

  #[test]
  fn test_token_persistence_and_logout() {
    let h = harness(DEAD_URL);
    h.client.set_token("abc");
    assert_eq!(h.storage.get_item(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("abc"));

    let key = ApiClient::cache_key("/api/faqs", &RequestOptions::get());
    h.client.cache().set(key.as_str(), &json!([1]), None);
    h.client.cache().set("other", &json!([2]), None);

    h.client.logout();

    assert!(!h.client.is_authenticated());
    assert_eq!(h.storage.get_item(AUTH_TOKEN_KEY).unwrap(), None);
    assert_eq!(h.client.cache().get::<Value>(key.as_str()), None);
    assert_eq!(h.client.cache().get::<Value>("other"), None);
    assert!(h.client.cache_info().keys.is_empty());
  }

  #[test]
  fn test_initialize_restores_token() {
    let h = harness(DEAD_URL);
    h.storage.set_item(AUTH_TOKEN_KEY, "persisted").unwrap();
    assert_eq!(h.client.token(), None);

    h.client.initialize();
    assert_eq!(h.client.token().as_deref(), Some("persisted"));
  }

  #[test]
  fn test_clear_cache_for_one_request() {
    let h = harness(DEAD_URL);
    let faqs = ApiClient::cache_key("/api/faqs", &RequestOptions::get());
    let footer = ApiClient::cache_key("/api/footer", &RequestOptions::get());
    h.client.cache().set(faqs.as_str(), &1, None);
    h.client.cache().set(footer.as_str(), &2, None);

    h.client.clear_cache("/api/faqs", &RequestOptions::get());

    assert_eq!(h.client.cache().get::<i32>(faqs.as_str()), None);
    assert_eq!(h.client.cache().get::<i32>(footer.as_str()), Some(2));
    let info = h.client.cache_info();
    assert_eq!(info.keys.len(), 2);
    assert!(info.size_bytes > 0);
  }
}
