//! Waystation Domain Layer
pub mod cache_request;
pub mod cached_response;
pub mod config;
pub mod errors;
pub mod lifecycle;
pub mod request_class;
pub mod store;
pub mod validators;

pub use cache_request::{CacheRequest, RequestIdentity};
pub use cached_response::CachedResponse;
pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use lifecycle::LifecycleState;
pub use request_class::{RequestClass, Route};
pub use store::{StoreNames, StoreRole};
