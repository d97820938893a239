//! The three fetch/cache algorithms.
//!
//! Every path ends in a response: store failures degrade to misses or
//! skipped writes, network failures become synthesized placeholder
//! responses. Nothing here returns an error to the caller.

mod cache_first;
mod network_first;
mod stale_while_revalidate;

use crate::ports::{CacheStorage, CacheStore, NetworkFetcher};
use crate::services::StrategyMetrics;
use crate::use_cases::eviction::EvictionPolicy;
use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};
use waystation_domain::config::CacheConfig;
use waystation_domain::{
    CacheRequest, CachedResponse, RequestClass, RequestIdentity, StoreNames, StoreRole,
};

pub struct StrategyEngine {
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn NetworkFetcher>,
    stores: StoreNames,
    eviction: EvictionPolicy,
    consult_static: bool,
    metrics: Arc<StrategyMetrics>,
    background: TaskTracker,
}

impl StrategyEngine {
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn NetworkFetcher>,
        config: &CacheConfig,
        metrics: Arc<StrategyMetrics>,
    ) -> Self {
        Self {
            storage,
            fetcher,
            stores: config.stores.clone(),
            eviction: EvictionPolicy::new(config.dynamic_max_entries, Arc::clone(&metrics)),
            consult_static: config.consult_static_on_cache_first,
            metrics,
            background: TaskTracker::new(),
        }
    }

    /// Runs the strategy matching `class`.
    pub async fn execute(&self, class: RequestClass, request: CacheRequest) -> CachedResponse {
        match class {
            RequestClass::StaticAsset => self.cache_first(request).await,
            RequestClass::ApiCall => self.stale_while_revalidate(request).await,
            RequestClass::Other => self.network_first(request).await,
        }
    }

    pub fn metrics(&self) -> &Arc<StrategyMetrics> {
        &self.metrics
    }

    /// Waits for every background refresh spawned so far.
    pub async fn wait_for_background(&self) {
        self.background.close();
        self.background.wait().await;
        self.background.reopen();
    }

    async fn open_role(&self, role: StoreRole) -> Option<Arc<dyn CacheStore>> {
        let name = self.stores.name(role);
        match self.storage.open(name).await {
            Ok(store) => Some(store),
            Err(e) => {
                StrategyMetrics::incr(&self.metrics.store_failures);
                warn!(store = name, role = %role, error = %e, "Failed to open store");
                None
            }
        }
    }

    /// Store read where a failure counts as a miss.
    async fn lookup(
        &self,
        store: &dyn CacheStore,
        identity: &RequestIdentity,
    ) -> Option<CachedResponse> {
        match store.get(identity).await {
            Ok(hit) => hit,
            Err(e) => {
                StrategyMetrics::incr(&self.metrics.store_failures);
                warn!(store = store.name(), %identity, error = %e, "Store read failed, treating as miss");
                None
            }
        }
    }

    /// Writes into the bounded dynamic store and enforces its bound.
    async fn remember(
        &self,
        store: &dyn CacheStore,
        identity: &RequestIdentity,
        response: CachedResponse,
    ) {
        match store.put(identity, response).await {
            Ok(()) => {
                self.eviction.enforce(store).await;
            }
            Err(e) => {
                StrategyMetrics::incr(&self.metrics.store_failures);
                warn!(store = store.name(), %identity, error = %e, "Store write failed");
            }
        }
    }

    fn synthesize(&self, response: CachedResponse) -> CachedResponse {
        StrategyMetrics::incr(&self.metrics.synthesized_responses);
        debug!(status = response.status, "Synthesized failure response");
        response
    }
}
