use super::LifecycleManager;
use tracing::{info, instrument, warn};
use waystation_domain::{DomainError, LifecycleState};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationReport {
    pub deleted: Vec<String>,
    /// Stale stores that could not be removed; retried on the next activation.
    pub retained: Vec<String>,
}

impl LifecycleManager {
    /// Deletes every store outside the current generation's allow-list and
    /// starts intercepting requests.
    #[instrument(skip(self))]
    pub async fn activate(&self) -> Result<ActivationReport, DomainError> {
        self.transition(LifecycleState::Activating)?;

        let mut report = ActivationReport::default();
        match self.storage.store_names().await {
            Ok(names) => {
                for name in names.into_iter().filter(|n| !self.stores.is_current(n)) {
                    match self.storage.delete_store(&name).await {
                        Ok(_) => {
                            info!(store = %name, "Deleted stale store");
                            report.deleted.push(name);
                        }
                        Err(e) => {
                            warn!(store = %name, error = %e, "Failed to delete stale store");
                            report.retained.push(name);
                        }
                    }
                }
            }
            Err(e) => warn!(error = %e, "Could not enumerate stores, skipping cleanup"),
        }

        self.transition(LifecycleState::Active)?;

        info!(
            deleted = report.deleted.len(),
            allow_list = ?self.stores.allow_list(),
            "Generation active, intercepting requests"
        );

        Ok(report)
    }
}
