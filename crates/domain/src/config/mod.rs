//! Configuration module for Waystation
//!
//! - `root`: Main configuration and CLI overrides
//! - `server`: Binding, application origin and upstream
//! - `cache`: Manifest, store names and the eviction bound
//! - `network`: Outbound fetch settings
//! - `storage`: Store backend selection
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod cache;
pub mod errors;
pub mod logging;
pub mod network;
pub mod root;
pub mod server;
pub mod storage;

pub use cache::CacheConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use network::NetworkConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use storage::{StorageBackend, StorageConfig};
