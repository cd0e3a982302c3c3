//! Connectivity tracking.
//!
//! Link connectivity and internet reachability are tracked separately: a
//! device can sit on Wi-Fi behind a captive portal, which is connected but
//! not reachable. The API client only goes to the network when both hold.

mod probe;

use futures::future::BoxFuture;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

pub use probe::{SocketProbe, StaticProbe};

/// Snapshot of the device's connectivity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkState {
  pub is_connected: bool,
  pub is_internet_reachable: bool,
  /// e.g. "wifi", "cellular", "none", "unknown"
  pub transport_type: String,
}

impl NetworkState {
  pub fn online() -> Self {
    Self {
      is_connected: true,
      is_internet_reachable: true,
      transport_type: "unknown".to_string(),
    }
  }

  pub fn offline() -> Self {
    Self {
      is_connected: false,
      is_internet_reachable: false,
      transport_type: "none".to_string(),
    }
  }

  /// Connected to a link that has no internet egress.
  pub fn degraded() -> Self {
    Self {
      is_connected: true,
      is_internet_reachable: false,
      transport_type: "unknown".to_string(),
    }
  }

  pub fn is_online(&self) -> bool {
    self.is_connected && self.is_internet_reachable
  }
}

/// Platform connectivity query.
pub trait ConnectivityProbe: Send + Sync {
  fn fetch(&self) -> BoxFuture<'_, NetworkState>;
}

/// Handle returned by [`NetworkObserver::subscribe`].
pub type ListenerId = u64;

type Listener = Arc<dyn Fn(&NetworkState) + Send + Sync>;

/// Holds the latest connectivity snapshot and fans out changes to listeners.
pub struct NetworkObserver {
  probe: Arc<dyn ConnectivityProbe>,
  snapshot: RwLock<Option<NetworkState>>,
  listeners: Mutex<Vec<(ListenerId, Listener)>>,
  next_id: AtomicU64,
}

impl NetworkObserver {
  pub fn new(probe: Arc<dyn ConnectivityProbe>) -> Self {
    Self {
      probe,
      snapshot: RwLock::new(None),
      listeners: Mutex::new(Vec::new()),
      next_id: AtomicU64::new(1),
    }
  }

  /// Latest snapshot, probing once if nothing has been observed yet.
  pub async fn current_state(&self) -> NetworkState {
    match self.snapshot() {
      Some(state) => state,
      None => self.refresh().await,
    }
  }

  /// Latest snapshot without any I/O.
  pub fn snapshot(&self) -> Option<NetworkState> {
    self
      .snapshot
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  /// Fresh platform query; does not touch the snapshot.
  pub async fn probe(&self) -> NetworkState {
    self.probe.fetch().await
  }

  pub async fn is_connected(&self) -> bool {
    self.probe().await.is_connected
  }

  pub async fn is_internet_reachable(&self) -> bool {
    self.probe().await.is_internet_reachable
  }

  /// Register a listener for every later transition. Past states are not replayed.
  pub fn subscribe<F>(&self, listener: F) -> ListenerId
  where
    F: Fn(&NetworkState) + Send + Sync + 'static,
  {
    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
    self
      .listeners
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .push((id, Arc::new(listener)));
    id
  }

  /// Returns false if `id` was not subscribed.
  pub fn unsubscribe(&self, id: ListenerId) -> bool {
    let mut listeners = self
      .listeners
      .lock()
      .unwrap_or_else(PoisonError::into_inner);
    let before = listeners.len();
    listeners.retain(|(listener_id, _)| *listener_id != id);
    listeners.len() != before
  }

  /// Probe, store the result, and notify listeners if it differs from the last snapshot.
  pub async fn refresh(&self) -> NetworkState {
    let state = self.probe.fetch().await;

    let changed = {
      let mut snapshot = self
        .snapshot
        .write()
        .unwrap_or_else(PoisonError::into_inner);
      let changed = snapshot.as_ref() != Some(&state);
      *snapshot = Some(state.clone());
      changed
    };

    if changed {
      info!(
        connected = state.is_connected,
        reachable = state.is_internet_reachable,
        transport = %state.transport_type,
        "network state changed"
      );
      self.notify(&state);
    }

    state
  }

  /// Re-probe on a fixed interval, standing in for platform change events.
  pub fn spawn_watcher(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
    let observer = Arc::clone(self);
    tokio::spawn(async move {
      let mut ticker = tokio::time::interval(interval);
      loop {
        ticker.tick().await;
        observer.refresh().await;
      }
    })
  }

  fn notify(&self, state: &NetworkState) {
    // Call outside the lock so listeners may (un)subscribe
    let listeners: Vec<Listener> = self
      .listeners
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .iter()
      .map(|(_, listener)| Arc::clone(listener))
      .collect();

    for listener in listeners {
      listener(state);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn observer(state: NetworkState) -> (Arc<StaticProbe>, NetworkObserver) {
    let probe = Arc::new(StaticProbe::new(state));
    let observer = NetworkObserver::new(probe.clone());
    (probe, observer)
  }

  fn recorder(observer: &NetworkObserver) -> (ListenerId, Arc<Mutex<Vec<NetworkState>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let id = observer.subscribe(move |state| sink.lock().unwrap().push(state.clone()));
    (id, seen)
  }

  #[tokio::test]
  async fn test_current_state_probes_once() {
    let (probe, observer) = observer(NetworkState::online());
    assert_eq!(observer.snapshot(), None);

    assert_eq!(observer.current_state().await, NetworkState::online());
    assert_eq!(observer.current_state().await, NetworkState::online());
    assert_eq!(probe.fetch_count(), 1);
  }

  #[tokio::test]
  async fn test_convenience_probes_are_fresh() {
    let (probe, observer) = observer(NetworkState::online());
    observer.refresh().await;

    probe.set(NetworkState::degraded());
    assert!(observer.is_connected().await);
    assert!(!observer.is_internet_reachable().await);
    // Snapshot is untouched by fresh probes
    assert_eq!(observer.snapshot(), Some(NetworkState::online()));
  }

  #[tokio::test]
  async fn test_listeners_see_transitions_only() {
    let (probe, observer) = observer(NetworkState::online());
    observer.refresh().await;
    let (_, seen) = recorder(&observer);

    observer.refresh().await;
    assert!(seen.lock().unwrap().is_empty());

    probe.set(NetworkState::offline());
    observer.refresh().await;
    probe.set(NetworkState::online());
    observer.refresh().await;

    assert_eq!(
      *seen.lock().unwrap(),
      vec![NetworkState::offline(), NetworkState::online()]
    );
  }

  #[tokio::test]
  async fn test_unsubscribe() {
    let (probe, observer) = observer(NetworkState::online());
    let (id, seen) = recorder(&observer);

    assert!(observer.unsubscribe(id));
    assert!(!observer.unsubscribe(id));

    probe.set(NetworkState::offline());
    observer.refresh().await;
    assert!(seen.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_listeners_called_in_registration_order() {
    let (probe, observer) = observer(NetworkState::online());
    let order = Arc::new(Mutex::new(Vec::new()));
    for n in 0..3 {
      let order = Arc::clone(&order);
      observer.subscribe(move |_| order.lock().unwrap().push(n));
    }

    probe.set(NetworkState::degraded());
    observer.refresh().await;
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
  }

  #[tokio::test(start_paused = true)]
  async fn test_watcher_picks_up_changes() {
    let (probe, observer) = observer(NetworkState::online());
    let observer = Arc::new(observer);
    let (_, seen) = recorder(&observer);

    let handle = observer.spawn_watcher(Duration::from_secs(5));
    tokio::time::sleep(Duration::from_secs(1)).await;
    probe.set(NetworkState::offline());
    tokio::time::sleep(Duration::from_secs(5)).await;
    handle.abort();

    assert_eq!(
      *seen.lock().unwrap(),
      vec![NetworkState::online(), NetworkState::offline()]
    );
  }

  #[test]
  fn test_is_online() {
    assert!(NetworkState::online().is_online());
    assert!(!NetworkState::degraded().is_online());
    assert!(!NetworkState::offline().is_online());
  }
}
