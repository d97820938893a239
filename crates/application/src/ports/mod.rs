pub mod cache_storage;
pub mod network_fetcher;

pub use cache_storage::{CacheStorage, CacheStore};
pub use network_fetcher::NetworkFetcher;
