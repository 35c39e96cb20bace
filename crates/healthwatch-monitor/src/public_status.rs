//! Cached public container status.
//!
//! Containers are discovered from the public index, but each one's payload is
//! fetched with private credentials. The cache is refreshed at most once per
//! window, no matter how many requests arrive.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::probes::parse_container_status;
use crate::source::{Access, HealthSource};

/// Status reported for a container until its payload says otherwise.
pub const DEFAULT_STATUS: &str = "unhealthy";

/// Public status of one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerStatus {
    pub status: String,
}

impl ContainerStatus {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

/// Container name to status, sorted by name.
pub type StatusMap = BTreeMap<String, ContainerStatus>;

#[derive(Default)]
struct CacheState {
    entries: StatusMap,
    last_refresh: Option<Instant>,
    generation: u64,
}

/// Public status cache.
pub struct PublicStatusCache {
    source: Arc<dyn HealthSource>,
    window: Duration,
    state: Mutex<CacheState>,
}

impl PublicStatusCache {
    pub fn new(source: Arc<dyn HealthSource>, window: Duration) -> Self {
        Self {
            source,
            window,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Current status map, refreshing it first if the window has elapsed.
    pub async fn get(&self) -> StatusMap {
        let generation = {
            let mut state = self.state.lock();
            let now = Instant::now();
            if let Some(last) = state.last_refresh {
                if now.duration_since(last) < self.window {
                    return state.entries.clone();
                }
            }
            state.last_refresh = Some(now);
            state.entries.clear();
            state.generation += 1;
            state.generation
        };

        self.refresh(generation).await;
        self.state.lock().entries.clone()
    }

    /// Cached entries without triggering a refresh.
    pub fn snapshot(&self) -> StatusMap {
        self.state.lock().entries.clone()
    }

    async fn refresh(&self, generation: u64) {
        info!("Refreshing public container status");

        let containers = match self.source.list_containers(Access::Public).await {
            Ok(containers) => containers,
            Err(e) => {
                error!(error = %e, "Public container discovery failed");
                return;
            }
        };

        for container in containers {
            if !self.update(generation, &container.name, DEFAULT_STATUS) {
                return;
            }

            let status = self
                .source
                .fetch_endpoint(&container.endpoint, Access::Private)
                .await
                .and_then(|payload| parse_container_status(&payload));

            match status {
                Ok(Some(status)) => {
                    if !self.update(generation, &container.name, &status) {
                        return;
                    }
                }
                Ok(None) => {
                    warn!(container = %container.name, "Container payload has no Status");
                }
                Err(e) => {
                    warn!(container = %container.name, error = %e, "Container status fetch failed");
                }
            }
        }
    }

    /// Write an entry unless a newer refresh has taken over.
    fn update(&self, generation: u64, name: &str, status: &str) -> bool {
        let mut state = self.state.lock();
        if state.generation != generation {
            return false;
        }
        state
            .entries
            .insert(name.to_string(), ContainerStatus::new(status));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSource;

    fn source() -> Arc<FakeSource> {
        let source = Arc::new(FakeSource::new());
        source.set(
            Access::Public,
            "index",
            "a.container.health.txt\nb.container.health.txt\nc.container.health.txt",
        );
        source.set(Access::Private, "a.container.health", r#"{"Status":"healthy"}"#);
        source.set(Access::Private, "b.container.health", r#"{"Status":"starting"}"#);
        source
    }

    fn cache(source: Arc<FakeSource>) -> PublicStatusCache {
        PublicStatusCache::new(source, Duration::from_secs(60))
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_request_refreshes() {
        let source = source();
        let cache = cache(source.clone());

        let map = cache.get().await;
        assert_eq!(map["a"], ContainerStatus::new("healthy"));
        assert_eq!(map["b"], ContainerStatus::new("starting"));
        assert_eq!(map["c"], ContainerStatus::new(DEFAULT_STATUS));

        let fetches = source.fetches();
        assert_eq!(fetches[0], (Access::Public, "index.txt".to_string()));
        assert!(fetches[1..].iter().all(|(access, _)| *access == Access::Private));
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_within_window_are_cached() {
        let source = source();
        let cache = cache(source.clone());

        let first = serde_json::to_string(&cache.get().await).unwrap();
        let fetches = source.fetch_count();

        source.set(Access::Private, "a.container.health", r#"{"Status":"unhealthy"}"#);
        tokio::time::advance(Duration::from_secs(59)).await;

        let second = serde_json::to_string(&cache.get().await).unwrap();
        assert_eq!(first, second);
        assert_eq!(source.fetch_count(), fetches);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_after_window_refreshes() {
        let source = source();
        let cache = cache(source.clone());
        cache.get().await;

        source.set(Access::Private, "a.container.health", r#"{"Status":"unhealthy"}"#);
        tokio::time::advance(Duration::from_secs(61)).await;

        let map = cache.get().await;
        assert_eq!(map["a"], ContainerStatus::new("unhealthy"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_drops_removed_containers() {
        let source = source();
        let cache = cache(source.clone());
        cache.get().await;

        source.set(Access::Public, "index", "a.container.health.txt");
        tokio::time::advance(Duration::from_secs(60)).await;

        let map = cache.get().await;
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_discovery_failure_leaves_empty_cache() {
        let source = source();
        source.remove(Access::Public, "index");
        let cache = cache(source.clone());

        assert!(cache.get().await.is_empty());
        assert!(cache.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_serialized_shape() {
        let cache = cache(source());
        let json = serde_json::to_string(&cache.get().await).unwrap();
        assert_eq!(
            json,
            r#"{"a":{"status":"healthy"},"b":{"status":"starting"},"c":{"status":"unhealthy"}}"#
        );
    }
}
