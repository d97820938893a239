use crate::ports::CacheStore;
use crate::services::StrategyMetrics;
use std::sync::Arc;
use tracing::{debug, warn};
use waystation_domain::{DomainError, RequestIdentity};

/// Deletes the oldest entries of `store` until it holds at most
/// `max_entries`. Keys are re-read after every deletion so a burst that
/// overshot the bound by several entries is fully drained.
///
/// Returns the number of entries removed.
pub async fn enforce_bound(store: &dyn CacheStore, max_entries: usize) -> Result<usize, DomainError> {
    let mut evicted = 0;
    let mut stalled_on: Option<RequestIdentity> = None;

    loop {
        let keys = store.keys().await?;
        if keys.len() <= max_entries {
            return Ok(evicted);
        }

        let Some(oldest) = keys.into_iter().next() else {
            return Ok(evicted);
        };

        if store.delete(&oldest).await? {
            evicted += 1;
            stalled_on = None;
            continue;
        }

        // Someone else removed it first; re-read. Seeing the same key refuse
        // deletion twice means the store is not making progress.
        if stalled_on.as_ref() == Some(&oldest) {
            return Err(DomainError::CacheUnavailable(format!(
                "store '{}' refused to delete {}",
                store.name(),
                oldest
            )));
        }
        stalled_on = Some(oldest);
    }
}

/// Bound applied to a store after every successful write into it.
#[derive(Clone)]
pub struct EvictionPolicy {
    max_entries: usize,
    metrics: Arc<StrategyMetrics>,
}

impl EvictionPolicy {
    pub fn new(max_entries: usize, metrics: Arc<StrategyMetrics>) -> Self {
        Self {
            max_entries,
            metrics,
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Never fails: store errors are logged and the request carries on.
    pub async fn enforce(&self, store: &dyn CacheStore) -> usize {
        match enforce_bound(store, self.max_entries).await {
            Ok(0) => 0,
            Ok(evicted) => {
                self.metrics
                    .evictions
                    .fetch_add(evicted as u64, std::sync::atomic::Ordering::Relaxed);
                debug!(
                    store = store.name(),
                    evicted,
                    max_entries = self.max_entries,
                    "Evicted oldest entries"
                );
                evicted
            }
            Err(e) => {
                StrategyMetrics::incr(&self.metrics.store_failures);
                warn!(
                    store = store.name(),
                    error = %e,
                    "Failed to enforce store bound"
                );
                0
            }
        }
    }
}
