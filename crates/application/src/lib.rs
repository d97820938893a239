//! Waystation Application Layer
//!
//! Ports implemented by the infrastructure crate, plus the request
//! orchestration built on top of them: routing, the three fetch/cache
//! strategies, eviction and the generation lifecycle.
pub mod ports;
pub mod services;
pub mod use_cases;
