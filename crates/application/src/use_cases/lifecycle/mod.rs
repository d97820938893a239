//! Deployment-generation lifecycle: seed the static store on install,
//! purge stale stores and start intercepting on activation.

mod activate;
mod install;

pub use activate::ActivationReport;
pub use install::{InstallReport, ManifestFailure};

use crate::ports::{CacheStorage, NetworkFetcher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;
use url::Url;
use waystation_domain::config::CacheConfig;
use waystation_domain::{DomainError, LifecycleState, StoreNames};

pub struct LifecycleManager {
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn NetworkFetcher>,
    app_origin: Url,
    manifest: Vec<String>,
    stores: StoreNames,
    state: RwLock<LifecycleState>,
    /// Set by the first `install`; later callers are rejected immediately.
    install_claimed: AtomicBool,
}

impl LifecycleManager {
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn NetworkFetcher>,
        app_origin: Url,
        config: &CacheConfig,
    ) -> Self {
        Self {
            storage,
            fetcher,
            app_origin,
            manifest: config.static_manifest.clone(),
            stores: config.stores.clone(),
            state: RwLock::new(LifecycleState::Installing),
            install_claimed: AtomicBool::new(false),
        }
    }

    /// Resumes a generation whose earlier steps ran in another process
    /// against the same durable storage.
    pub fn resumed_at(self, state: LifecycleState) -> Self {
        Self {
            state: RwLock::new(state),
            ..self
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_intercepting(&self) -> bool {
        self.state().intercepts()
    }

    fn transition(&self, next: LifecycleState) -> Result<(), DomainError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if !state.can_transition_to(next) {
            return Err(DomainError::InvalidLifecycleTransition {
                from: state.as_str(),
                to: next.as_str(),
            });
        }
        info!(from = state.as_str(), to = next.as_str(), "Lifecycle transition");
        *state = next;
        Ok(())
    }

    /// Claims the single install run of this generation. Checked and set
    /// under the state lock so concurrent callers cannot both seed.
    fn claim_install(&self) -> Result<(), DomainError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let rejected = DomainError::InvalidLifecycleTransition {
            from: state.as_str(),
            to: LifecycleState::Installed.as_str(),
        };
        if *state != LifecycleState::Installing {
            return Err(rejected);
        }
        if self.install_claimed.swap(true, Ordering::AcqRel) {
            return Err(rejected);
        }
        Ok(())
    }
}
