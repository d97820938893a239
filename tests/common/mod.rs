#![allow(dead_code)]

use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;
use waystation_application::ports::{CacheStorage, NetworkFetcher};
use waystation_application::services::StrategyMetrics;
use waystation_application::use_cases::{
    LifecycleManager, RequestClassifier, RequestRouter, StrategyEngine,
};
use waystation_domain::config::{CacheConfig, NetworkConfig};
use waystation_domain::{CacheRequest, CachedResponse, LifecycleState, StoreNames};
use waystation_infrastructure::database::{create_memory_pool, create_pool};
use waystation_infrastructure::network::ReqwestFetcher;
use waystation_infrastructure::storage::SqliteCacheStorage;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const APP_ORIGIN: &str = "https://app.test";

pub fn app_origin() -> Url {
    Url::parse(APP_ORIGIN).unwrap()
}

pub fn get(path: &str) -> CacheRequest {
    CacheRequest::parse_get(&format!("{APP_ORIGIN}{path}")).unwrap()
}

/// Serves `body` for GET `route` on the mock upstream.
pub async fn serve(upstream: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_string(body),
        )
        .mount(upstream)
        .await;
}

pub async fn serve_manifest(upstream: &MockServer, manifest: &[String]) {
    for route in manifest {
        serve(upstream, route, &format!("asset {route}")).await;
    }
}

/// An address nothing listens on; every fetch against it fails to connect.
pub fn dead_upstream() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}")).unwrap()
}

/// One process worth of wiring: fetcher, lifecycle, engine and router.
pub struct Wiring {
    pub lifecycle: Arc<LifecycleManager>,
    pub engine: Arc<StrategyEngine>,
    pub router: Arc<RequestRouter>,
    pub metrics: Arc<StrategyMetrics>,
}

impl Wiring {
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        upstream: Url,
        cache: &CacheConfig,
        state: LifecycleState,
    ) -> Self {
        let fetcher: Arc<dyn NetworkFetcher> = Arc::new(
            ReqwestFetcher::new(&NetworkConfig::default(), app_origin(), Some(upstream)).unwrap(),
        );
        let metrics = Arc::new(StrategyMetrics::default());
        let lifecycle = Arc::new(
            LifecycleManager::new(
                Arc::clone(&storage),
                Arc::clone(&fetcher),
                app_origin(),
                cache,
            )
            .resumed_at(state),
        );
        let engine = Arc::new(StrategyEngine::new(
            storage,
            Arc::clone(&fetcher),
            cache,
            Arc::clone(&metrics),
        ));
        let router = Arc::new(RequestRouter::new(
            RequestClassifier::new(app_origin(), &cache.static_manifest),
            Arc::clone(&lifecycle),
            Arc::clone(&engine),
            fetcher,
        ));

        Self {
            lifecycle,
            engine,
            router,
            metrics,
        }
    }

    pub async fn dispatch(&self, path: &str) -> CachedResponse {
        self.router.dispatch(get(path)).await
    }
}

pub struct TestStack {
    pub upstream: MockServer,
    pub storage: Arc<dyn CacheStorage>,
    pub cache: CacheConfig,
    pub online: Wiring,
}

impl TestStack {
    pub async fn start() -> Self {
        TestStackBuilder::new().build().await
    }

    /// Seeds the manifest on the upstream, then installs and activates.
    pub async fn start_active() -> Self {
        let stack = Self::start().await;
        stack.install_and_activate().await;
        stack
    }

    pub async fn install_and_activate(&self) {
        serve_manifest(&self.upstream, &self.cache.static_manifest).await;
        let report = self.online.lifecycle.install().await.unwrap();
        assert!(report.is_complete(), "manifest should seed fully: {report:?}");
        self.online.lifecycle.activate().await.unwrap();
    }

    /// Same storage and generation, but the upstream is unreachable.
    pub fn offline(&self) -> Wiring {
        Wiring::new(
            Arc::clone(&self.storage),
            dead_upstream(),
            &self.cache,
            LifecycleState::Active,
        )
    }

    pub async fn keys_of(&self, store: &str) -> Vec<String> {
        let store = self.storage.open(store).await.unwrap();
        store
            .keys()
            .await
            .unwrap()
            .iter()
            .map(|k| k.to_string())
            .collect()
    }
}

pub struct TestStackBuilder {
    cache: CacheConfig,
    database: Option<PathBuf>,
}

impl TestStackBuilder {
    pub fn new() -> Self {
        Self {
            cache: CacheConfig::default(),
            database: None,
        }
    }

    pub fn with_generation(mut self, suffix: &str) -> Self {
        self.cache.stores = StoreNames {
            static_name: format!("static-{suffix}"),
            dynamic_name: format!("dynamic-{suffix}"),
            api_name: format!("api-{suffix}"),
        };
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.cache.dynamic_max_entries = max_entries;
        self
    }

    pub fn with_static_lookup(mut self) -> Self {
        self.cache.consult_static_on_cache_first = true;
        self
    }

    /// Uses a SQLite file instead of a private in-memory database.
    pub fn with_database(mut self, file: &Path) -> Self {
        self.database = Some(file.to_path_buf());
        self
    }

    pub async fn build(self) -> TestStack {
        let pool = match &self.database {
            Some(file) => create_pool(&format!("sqlite:{}", file.display()))
                .await
                .unwrap(),
            None => create_memory_pool().await.unwrap(),
        };
        let storage: Arc<dyn CacheStorage> = Arc::new(SqliteCacheStorage::new(pool));
        let upstream = MockServer::start().await;
        let online = Wiring::new(
            Arc::clone(&storage),
            Url::parse(&upstream.uri()).unwrap(),
            &self.cache,
            LifecycleState::Installing,
        );

        TestStack {
            upstream,
            storage,
            cache: self.cache,
            online,
        }
    }
}
