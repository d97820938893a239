use super::StrategyEngine;
use crate::services::StrategyMetrics;
use tracing::{debug, instrument, warn};
use waystation_domain::{CacheRequest, CachedResponse, StoreRole};

impl StrategyEngine {
    /// Prefer the network; fall back to the dynamic store when the fetch
    /// fails or returns a non-success status.
    #[instrument(skip_all, fields(url = %request.url))]
    pub async fn network_first(&self, request: CacheRequest) -> CachedResponse {
        let identity = request.identity();
        let dynamic = self.open_role(StoreRole::Dynamic).await;

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
                let cached = match &dynamic {
                    Some(store) => self.lookup(store.as_ref(), &identity).await,
                    None => None,
                };
                match cached {
                    Some(hit) => {
                        StrategyMetrics::incr(&self.metrics.cache_hits);
                        debug!(status = response.status, "Non-success status, serving cached copy");
                        hit
                    }
                    None => {
                        StrategyMetrics::incr(&self.metrics.cache_misses);
                        debug!(status = response.status, "Non-success status and no cached copy");
                        response
                    }
                }
            }
            Err(e) => {
                StrategyMetrics::incr(&self.metrics.network_failures);
                let cached = match &dynamic {
                    Some(store) => self.lookup(store.as_ref(), &identity).await,
                    None => None,
                };
                match cached {
                    Some(hit) => {
                        StrategyMetrics::incr(&self.metrics.cache_hits);
                        debug!(error = %e, "Network failed, serving cached copy");
                        hit
                    }
                    None => {
                        StrategyMetrics::incr(&self.metrics.cache_misses);
                        warn!(error = %e, "Network failed and no cached copy");
                        self.synthesize(CachedResponse::network_and_cache_failure())
                    }
                }
            }
        }
    }
}
