use std::sync::Arc;
use waystation_application::ports::{CacheStorage, NetworkFetcher};
use waystation_application::services::StrategyMetrics;
use waystation_application::use_cases::{
    LifecycleManager, RequestClassifier, RequestRouter, StrategyEngine,
};
use waystation_domain::{Config, LifecycleState};
use waystation_infrastructure::network::ReqwestFetcher;

/// Wires ports to use cases for one deployment generation.
pub struct Services {
    pub lifecycle: Arc<LifecycleManager>,
    pub router: Arc<RequestRouter>,
    pub metrics: Arc<StrategyMetrics>,
}

impl Services {
    pub fn build(
        config: &Config,
        storage: Arc<dyn CacheStorage>,
        resume_at: LifecycleState,
    ) -> anyhow::Result<Self> {
        let app_origin = config.app_origin()?;
        let fetcher: Arc<dyn NetworkFetcher> = Arc::new(ReqwestFetcher::new(
            &config.network,
            app_origin.clone(),
            config.upstream()?,
        )?);
        let metrics = Arc::new(StrategyMetrics::default());

        let lifecycle = Arc::new(
            LifecycleManager::new(
                Arc::clone(&storage),
                Arc::clone(&fetcher),
                app_origin.clone(),
                &config.cache,
            )
            .resumed_at(resume_at),
        );
        let engine = Arc::new(StrategyEngine::new(
            storage,
            Arc::clone(&fetcher),
            &config.cache,
            Arc::clone(&metrics),
        ));
        let router = Arc::new(RequestRouter::new(
            RequestClassifier::new(app_origin, &config.cache.static_manifest),
            Arc::clone(&lifecycle),
            engine,
            fetcher,
        ));

        Ok(Self {
            lifecycle,
            router,
            metrics,
        })
    }
}
