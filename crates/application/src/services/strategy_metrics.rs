use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by the router, strategies and eviction policy.
#[derive(Debug, Default)]
pub struct StrategyMetrics {
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
    pub network_failures: AtomicU64,
    pub non_success_responses: AtomicU64,
    pub synthesized_responses: AtomicU64,
    pub store_failures: AtomicU64,
    pub evictions: AtomicU64,
    pub background_refreshes: AtomicU64,
    pub passthrough: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub network_failures: u64,
    pub non_success_responses: u64,
    pub synthesized_responses: u64,
    pub store_failures: u64,
    pub evictions: u64,
    pub background_refreshes: u64,
    pub passthrough: u64,
}

impl StrategyMetrics {
    #[inline]
    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            network_failures: self.network_failures.load(Ordering::Relaxed),
            non_success_responses: self.non_success_responses.load(Ordering::Relaxed),
            synthesized_responses: self.synthesized_responses.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            background_refreshes: self.background_refreshes.load(Ordering::Relaxed),
            passthrough: self.passthrough.load(Ordering::Relaxed),
        }
    }
}

impl MetricsSnapshot {
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }
}
