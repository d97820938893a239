use crate::ports::NetworkFetcher;
use crate::services::StrategyMetrics;
use crate::use_cases::lifecycle::LifecycleManager;
use crate::use_cases::strategies::StrategyEngine;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;
use waystation_domain::request_class::PassThroughReason;
use waystation_domain::{CacheRequest, CachedResponse, RequestClass, Route};

const API_PREFIX: &str = "/api/";

/// Pure, synchronous request classification.
#[derive(Debug, Clone)]
pub struct RequestClassifier {
    app_origin: Url,
    manifest: HashSet<String>,
}

impl RequestClassifier {
    pub fn new(app_origin: Url, manifest: &[String]) -> Self {
        Self {
            app_origin,
            manifest: manifest.iter().cloned().collect(),
        }
    }

    pub fn app_origin(&self) -> &Url {
        &self.app_origin
    }

    pub fn classify(&self, request: &CacheRequest) -> Route {
        if !request.is_same_origin(&self.app_origin) {
            return Route::PassThrough(PassThroughReason::CrossOrigin);
        }
        if !request.is_get() {
            return Route::PassThrough(PassThroughReason::NonGetMethod);
        }

        let path = request.path();
        if path == "/" || self.manifest.contains(path) {
            Route::Intercept(RequestClass::StaticAsset)
        } else if path.starts_with(API_PREFIX) {
            Route::Intercept(RequestClass::ApiCall)
        } else {
            Route::Intercept(RequestClass::Other)
        }
    }
}

/// Single entry point for every outbound request of the application.
pub struct RequestRouter {
    classifier: RequestClassifier,
    lifecycle: Arc<LifecycleManager>,
    engine: Arc<StrategyEngine>,
    fetcher: Arc<dyn NetworkFetcher>,
}

impl RequestRouter {
    pub fn new(
        classifier: RequestClassifier,
        lifecycle: Arc<LifecycleManager>,
        engine: Arc<StrategyEngine>,
        fetcher: Arc<dyn NetworkFetcher>,
    ) -> Self {
        Self {
            classifier,
            lifecycle,
            engine,
            fetcher,
        }
    }

    pub fn route(&self, request: &CacheRequest) -> Route {
        if !self.lifecycle.is_intercepting() {
            return Route::PassThrough(PassThroughReason::NotActive);
        }
        self.classifier.classify(request)
    }

    /// Always yields a response; the caller cannot tell which path served it.
    #[instrument(skip_all, fields(method = %request.method, url = %request.url))]
    pub async fn dispatch(&self, request: CacheRequest) -> CachedResponse {
        match self.route(&request) {
            Route::Intercept(class) => {
                debug!(class = %class, strategy = class.strategy_name(), "Intercepted");
                self.engine.execute(class, request).await
            }
            Route::PassThrough(reason) => {
                debug!(reason = reason.as_str(), "Passing through to network");
                self.pass_through(&request).await
            }
        }
    }

    async fn pass_through(&self, request: &CacheRequest) -> CachedResponse {
        StrategyMetrics::incr(&self.engine.metrics().passthrough);
        match self.fetcher.fetch(request).await {
            Ok(response) => response,
            Err(e) => {
                StrategyMetrics::incr(&self.engine.metrics().network_failures);
                warn!(error = %e, "Pass-through fetch failed");
                CachedResponse::upstream_unreachable()
            }
        }
    }

    pub fn engine(&self) -> &Arc<StrategyEngine> {
        &self.engine
    }

    pub fn lifecycle(&self) -> &Arc<LifecycleManager> {
        &self.lifecycle
    }
}
