use super::StrategyEngine;
use crate::ports::{CacheStore, NetworkFetcher};
use crate::services::StrategyMetrics;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};
use waystation_domain::{CacheRequest, CachedResponse, DomainError, StoreRole};

impl StrategyEngine {
    /// Answer from the api store immediately when possible while a refresh
    /// runs to completion in the background. Without a cached copy the
    /// refresh result is awaited; a failed fetch yields a synthesized 400.
    #[instrument(skip_all, fields(url = %request.url))]
    pub async fn stale_while_revalidate(&self, request: CacheRequest) -> CachedResponse {
        let identity = request.identity();
        let api = self.open_role(StoreRole::Api).await;

        let cached = match &api {
            Some(store) => self.lookup(store.as_ref(), &identity).await,
            None => None,
        };

        let refresh = self.spawn_refresh(request, api);

        if let Some(hit) = cached {
            StrategyMetrics::incr(&self.metrics.cache_hits);
            debug!("Serving cached copy, refresh continues in background");
            return hit;
        }
        StrategyMetrics::incr(&self.metrics.cache_misses);

        match refresh.await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(error = %e, "API fetch failed with no cached copy");
                self.synthesize(CachedResponse::api_failure())
            }
            Err(e) => {
                error!(error = %e, "API refresh task aborted");
                self.synthesize(CachedResponse::api_failure())
            }
        }
    }

    fn spawn_refresh(
        &self,
        request: CacheRequest,
        store: Option<Arc<dyn CacheStore>>,
    ) -> JoinHandle<Result<CachedResponse, DomainError>> {
        let fetcher = Arc::clone(&self.fetcher);
        let metrics = Arc::clone(&self.metrics);

        self.background
            .spawn(async move { refresh(fetcher.as_ref(), &metrics, &request, store).await })
    }
}

async fn refresh(
    fetcher: &dyn NetworkFetcher,
    metrics: &StrategyMetrics,
    request: &CacheRequest,
    store: Option<Arc<dyn CacheStore>>,
) -> Result<CachedResponse, DomainError> {
    let response = fetcher.fetch(request).await.inspect_err(|_| {
        StrategyMetrics::incr(&metrics.network_failures);
    })?;

    if !response.is_success() {
        StrategyMetrics::incr(&metrics.non_success_responses);
        debug!(status = response.status, url = %request.url, "Refresh returned non-success status, not stored");
        return Ok(response);
    }

    if let Some(store) = store {
        let identity = request.identity();
        match store.put(&identity, response.clone()).await {
            Ok(()) => {
                StrategyMetrics::incr(&metrics.background_refreshes);
                debug!(store = store.name(), %identity, "API entry refreshed");
            }
            Err(e) => {
                StrategyMetrics::incr(&metrics.store_failures);
                warn!(store = store.name(), %identity, error = %e, "Failed to store refreshed API response");
            }
        }
    }

    Ok(response)
}
