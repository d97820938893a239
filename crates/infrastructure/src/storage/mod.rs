pub mod memory;
pub mod sqlite;

pub use memory::{InMemoryCacheStorage, MemoryCacheStore};
pub use sqlite::{SqliteCacheStorage, SqliteCacheStore};
