//! Mic Visualizer - Live Microphone Metrics Core
//!
//! Captures the default microphone and derives two metrics per display frame:
//! loudness (RMS scaled to 0-100) and dominant frequency (peak FFT bin in Hz).

pub mod analysis;
pub mod audio;
pub mod config;
pub mod lifecycle;
pub mod spectrum;

#[cfg(test)]
pub(crate) mod test_log;

pub use analysis::MetricsSnapshot;
pub use audio::{AcquisitionError, Acquirer, CpalAcquirer, StreamHandle};
pub use config::AnalyzerConfig;
pub use lifecycle::{LifecycleController, Readout, RecordingState};
