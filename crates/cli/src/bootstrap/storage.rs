use std::sync::Arc;
use tracing::{error, info};
use waystation_application::ports::CacheStorage;
use waystation_domain::config::{StorageBackend, StorageConfig};
use waystation_infrastructure::database::create_pool;
use waystation_infrastructure::storage::{InMemoryCacheStorage, SqliteCacheStorage};

pub async fn init_storage(cfg: &StorageConfig) -> anyhow::Result<Arc<dyn CacheStorage>> {
    match cfg.backend {
        StorageBackend::Memory => {
            info!("Using in-memory cache storage (not durable)");
            Ok(Arc::new(InMemoryCacheStorage::new()))
        }
        StorageBackend::Sqlite => {
            info!("Initializing cache database: {}", cfg.database_url);
            let pool = create_pool(&cfg.database_url).await.map_err(|e| {
                error!("Failed to initialize cache database: {}", e);
                anyhow::anyhow!(e)
            })?;
            Ok(Arc::new(SqliteCacheStorage::new(pool)))
        }
    }
}
