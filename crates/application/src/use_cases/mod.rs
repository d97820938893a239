pub mod eviction;
pub mod lifecycle;
pub mod router;
pub mod strategies;

pub use eviction::{enforce_bound, EvictionPolicy};
pub use lifecycle::{ActivationReport, InstallReport, LifecycleManager, ManifestFailure};
pub use router::{RequestClassifier, RequestRouter};
pub use strategies::StrategyEngine;
