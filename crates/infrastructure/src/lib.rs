//! Waystation Infrastructure Layer
//!
//! Adapters for the application ports: cache storage (in-memory and
//! SQLite) and the HTTP network fetcher.
pub mod database;
pub mod network;
pub mod storage;
