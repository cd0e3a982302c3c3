use color_eyre::{eyre::eyre, Result};
use futures::future::BoxFuture;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::net::{lookup_host, TcpStream, UdpSocket};
use tracing::debug;
use url::Url;

use super::{ConnectivityProbe, NetworkState};

/// Public address asked about when the API host itself has no route; no packet is sent.
const FALLBACK_ROUTE_ADDR: SocketAddr =
  SocketAddr::new(IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)), 53);

/// Probe built on plain sockets.
///
/// Link connectivity means the OS has a route to one of the API host's
/// addresses, or failing that to the public internet. Reachability means a TCP connection to the API host succeeds within
/// the timeout.
pub struct SocketProbe {
  host: String,
  port: u16,
  timeout: Duration,
}

impl SocketProbe {
  pub fn for_url(url: &Url, timeout: Duration) -> Result<Self> {
    let host = url
      .host_str()
      .ok_or_else(|| eyre!("API URL has no host: {}", url))?
      .trim_matches(|c| c == '[' || c == ']')
      .to_string();
    let port = url
      .port_or_known_default()
      .ok_or_else(|| eyre!("API URL has no known port: {}", url))?;

    Ok(Self {
      host,
      port,
      timeout,
    })
  }

  fn is_loopback(&self) -> bool {
    self.host == "localhost"
      || self
        .host
        .parse::<IpAddr>()
        .is_ok_and(|ip| ip.is_loopback())
  }

  async fn has_route(&self) -> bool {
    // A local API is always "linked"
    if self.is_loopback() {
      return true;
    }
    for target in self.route_targets().await {
      if udp_route(target).await {
        return true;
      }
    }
    false
  }

  /// The API host's resolved addresses, then the public fallback.
  async fn route_targets(&self) -> Vec<SocketAddr> {
    let lookup = lookup_host((self.host.as_str(), self.port));
    let mut targets: Vec<SocketAddr> = match tokio::time::timeout(self.timeout, lookup).await {
      Ok(Ok(addrs)) => addrs.collect(),
      Ok(Err(e)) => {
        debug!(host = %self.host, error = %e, "could not resolve API host");
        Vec::new()
      }
      Err(_) => {
        debug!(host = %self.host, "timed out resolving API host");
        Vec::new()
      }
    };
    targets.push(FALLBACK_ROUTE_ADDR);
    targets
  }

  async fn host_reachable(&self) -> bool {
    let connect = TcpStream::connect((self.host.as_str(), self.port));
    matches!(tokio::time::timeout(self.timeout, connect).await, Ok(Ok(_)))
  }
}

impl ConnectivityProbe for SocketProbe {
  fn fetch(&self) -> BoxFuture<'_, NetworkState> {
    Box::pin(async move {
      let is_connected = self.has_route().await;
      let is_internet_reachable = is_connected && self.host_reachable().await;
      NetworkState {
        is_connected,
        is_internet_reachable,
        transport_type: if is_connected { "unknown" } else { "none" }.to_string(),
      }
    })
  }
}

/// Whether the OS has a route to `target`. Connecting a UDP socket only
/// selects a route; nothing is sent.
async fn udp_route(target: SocketAddr) -> bool {
  let local = match target {
    SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
    SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
  };
  match UdpSocket::bind(local).await {
    Ok(socket) => socket.connect(target).await.is_ok(),
    Err(_) => false,
  }
}

/// Probe that reports whatever it was last told. Backs `--offline`.
pub struct StaticProbe {
  state: Mutex<NetworkState>,
  fetches: AtomicUsize,
}

impl StaticProbe {
  pub fn new(state: NetworkState) -> Self {
    Self {
      state: Mutex::new(state),
      fetches: AtomicUsize::new(0),
    }
  }

  pub fn set(&self, state: NetworkState) {
    *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
  }

  /// How many times the probe has been queried.
  pub fn fetch_count(&self) -> usize {
    self.fetches.load(Ordering::SeqCst)
  }
}

impl ConnectivityProbe for StaticProbe {
  fn fetch(&self) -> BoxFuture<'_, NetworkState> {
    self.fetches.fetch_add(1, Ordering::SeqCst);
    let state = self
      .state
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .clone();
    Box::pin(async move { state })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tokio::net::TcpListener;

  #[test]
  fn test_for_url_uses_default_port() {
    let probe = SocketProbe::for_url(
      &Url::parse("https://cready.in").unwrap(),
      Duration::from_secs(1),
    )
    .unwrap();
    assert_eq!(probe.host, "cready.in");
    assert_eq!(probe.port, 443);
    assert!(!probe.is_loopback());
  }

  #[test]
  fn test_loopback_detection() {
    for url in ["http://localhost:8080", "http://127.0.0.1:3000", "http://[::1]:3000"] {
      let probe = SocketProbe::for_url(&Url::parse(url).unwrap(), Duration::from_secs(1)).unwrap();
      assert!(probe.is_loopback(), "{url}");
    }
  }

  #[tokio::test]
  async fn test_route_targets_start_with_api_address() {
    for (url, first) in [
      ("http://10.0.0.5:8080", "10.0.0.5:8080"),
      ("https://[2001:db8::1]", "[2001:db8::1]:443"),
    ] {
      let probe = SocketProbe::for_url(&Url::parse(url).unwrap(), Duration::from_secs(1)).unwrap();
      let targets = probe.route_targets().await;
      assert_eq!(targets[0], first.parse::<SocketAddr>().unwrap(), "{url}");
      assert_eq!(targets.last(), Some(&FALLBACK_ROUTE_ADDR));
    }
  }

  #[tokio::test]
  async fn test_udp_route_to_loopback() {
    assert!(udp_route("127.0.0.1:9".parse().unwrap()).await);
  }

  #[tokio::test]
  async fn test_local_listener_is_reachable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let url = Url::parse(&format!("http://{}", addr)).unwrap();

    let state = SocketProbe::for_url(&url, Duration::from_secs(2))
      .unwrap()
      .fetch()
      .await;
    assert!(state.is_online());
  }

  #[tokio::test]
  async fn test_static_probe_counts_fetches() {
    let probe = StaticProbe::new(NetworkState::offline());
    assert_eq!(probe.fetch().await, NetworkState::offline());
    probe.set(NetworkState::online());
    assert_eq!(probe.fetch().await, NetworkState::online());
    assert_eq!(probe.fetch_count(), 2);
  }
}
