use super::StrategyEngine;
use crate::services::StrategyMetrics;
use tracing::{debug, instrument, warn};
use waystation_domain::{CacheRequest, CachedResponse, StoreRole};

impl StrategyEngine {
    /// Serve from the dynamic store when present; otherwise fetch, remember
    /// successful responses and answer failures with a synthesized 408.
    #[instrument(skip_all, fields(url = %request.url))]
    pub async fn cache_first(&self, request: CacheRequest) -> CachedResponse {
        let identity = request.identity();

        if self.consult_static {
            if let Some(store) = self.open_role(StoreRole::Static).await {
                if let Some(hit) = self.lookup(store.as_ref(), &identity).await {
                    StrategyMetrics::incr(&self.metrics.cache_hits);
                    debug!(store = store.name(), "Cache-first hit");
                    return hit;
                }
            }
        }

        let dynamic = self.open_role(StoreRole::Dynamic).await;
        if let Some(store) = &dynamic {
            if let Some(hit) = self.lookup(store.as_ref(), &identity).await {
                StrategyMetrics::incr(&self.metrics.cache_hits);
                debug!(store = store.name(), "Cache-first hit");
                return hit;
            }
        }
        StrategyMetrics::incr(&self.metrics.cache_misses);

        match self.fetcher.fetch(&request).await {
            Ok(response) if response.is_success() => {
                if let Some(store) = &dynamic {
                    self.remember(store.as_ref(), &identity, response.clone())
                        .await;
                }
                response
            }
            Ok(response) => {
                StrategyMetrics::incr(&self.metrics.non_success_responses);
                warn!(status = response.status, "Cache-first fetch returned non-success status");
                self.synthesize(CachedResponse::network_error())
            }
            Err(e) => {
                StrategyMetrics::incr(&self.metrics.network_failures);
                warn!(error = %e, "Cache-first fetch failed");
                self.synthesize(CachedResponse::network_error())
            }
        }
    }
}
