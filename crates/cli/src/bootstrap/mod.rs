pub mod config;
pub mod logging;
pub mod storage;

pub use config::{load_config, log_config_summary};
pub use logging::init_logging;
pub use storage::init_storage;
