//! Per-frame loudness and dominant-frequency analysis

pub mod engine;
pub mod metrics;

pub use engine::{AnalysisContext, AnalysisEngine};
pub use metrics::MetricsSnapshot;
