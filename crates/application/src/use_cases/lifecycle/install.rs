use super::LifecycleManager;
use futures::future::join_all;
use tracing::{info, instrument, warn};
use waystation_domain::{CacheRequest, DomainError, LifecycleState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFailure {
    pub path: String,
    pub error: DomainError,
}

/// Outcome of seeding the static store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Manifest paths now present in the static store, in manifest order.
    pub cached: Vec<String>,
    pub failed: Vec<ManifestFailure>,
}

impl InstallReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl LifecycleManager {
    /// Fetches every manifest path and stores it in the static store.
    ///
    /// Each path is seeded independently: a failed fetch, a non-success
    /// status or a failed write is recorded and skipped, and the lifecycle
    /// still reaches `installed`.
    #[instrument(skip(self), fields(manifest = self.manifest.len()))]
    pub async fn install(&self) -> Result<InstallReport, DomainError> {
        self.claim_install()?;

        let store = match self.storage.open(&self.stores.static_name).await {
            Ok(store) => Some(store),
            Err(e) => {
                warn!(store = %self.stores.static_name, error = %e, "Static store unavailable, nothing will be seeded");
                None
            }
        };

        let attempts = self.manifest.iter().map(|path| {
            let store = store.clone();
            async move {
                let outcome = match store {
                    Some(store) => self.seed_one(store.as_ref(), path).await,
                    None => Err(DomainError::CacheUnavailable(format!(
                        "store '{}' could not be opened",
                        self.stores.static_name
                    ))),
                };
                (path.clone(), outcome)
            }
        });

        let mut report = InstallReport::default();
        for (path, outcome) in join_all(attempts).await {
            match outcome {
                Ok(()) => report.cached.push(path),
                Err(error) => {
                    warn!(path = %path, error = %error, "Manifest entry not cached");
                    report.failed.push(ManifestFailure { path, error });
                }
            }
        }

        self.transition(LifecycleState::Installed)?;

        info!(
            cached = report.cached.len(),
            failed = report.failed.len(),
            "Static manifest seeded"
        );

        Ok(report)
    }

    async fn seed_one(
        &self,
        store: &dyn crate::ports::CacheStore,
        path: &str,
    ) -> Result<(), DomainError> {
        let url = self.app_origin.join(path).map_err(|e| DomainError::ManifestFetchFailure {
            url: path.to_string(),
            reason: e.to_string(),
        })?;
        if url.origin() != self.app_origin.origin() {
            return Err(DomainError::ManifestFetchFailure {
                url: url.to_string(),
                reason: "resolves outside the application origin".to_string(),
            });
        }
        let request = CacheRequest::get(url);

        let response = self
            .fetcher
            .fetch(&request)
            .await
            .map_err(|e| DomainError::ManifestFetchFailure {
                url: request.url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(DomainError::ManifestFetchFailure {
                url: request.url.to_string(),
                reason: DomainError::NonSuccessStatus(response.status).to_string(),
            });
        }

        store.put(&request.identity(), response).await
    }
}
