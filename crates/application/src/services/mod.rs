pub mod strategy_metrics;

pub use strategy_metrics::{MetricsSnapshot, StrategyMetrics};
