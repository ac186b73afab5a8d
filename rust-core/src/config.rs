//! Analyser configuration
//!
//! Parameters fixed for the lifetime of one recording session

use crate::spectrum::windowing::WindowType;
use thiserror::Error;

/// Smallest analysis window accepted
pub const MIN_WINDOW_SIZE: usize = 32;

/// Largest analysis window accepted
pub const MAX_WINDOW_SIZE: usize = 32768;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Window size must be a power of two in [32, 32768] (got {0})")]
    WindowSize(usize),

    #[error("Smoothing time constant must be in [0, 1] (got {0})")]
    Smoothing(f64),

    #[error("Decibel range is empty: min {min} dB must be below max {max} dB")]
    DecibelRange { min: f64, max: f64 },
}

/// Analyser configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Samples per analysis frame (power of two)
    pub window_size: usize,

    /// Window applied before the FFT
    pub window_type: WindowType,

    /// Weight of the previous frame when smoothing magnitudes over time
    pub smoothing_time_constant: f64,

    /// Level mapped to byte 0 in the frequency readout
    pub min_decibels: f64,

    /// Level mapped to byte 255 in the frequency readout
    pub max_decibels: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            window_size: 2048,
            window_type: WindowType::Blackman,
            smoothing_time_constant: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.window_size;
        if !n.is_power_of_two() || !(MIN_WINDOW_SIZE..=MAX_WINDOW_SIZE).contains(&n) {
            return Err(ConfigError::WindowSize(n));
        }
        if !(0.0..=1.0).contains(&self.smoothing_time_constant) {
            return Err(ConfigError::Smoothing(self.smoothing_time_constant));
        }
        if !(self.min_decibels < self.max_decibels) {
            return Err(ConfigError::DecibelRange {
                min: self.min_decibels,
                max: self.max_decibels,
            });
        }
        Ok(())
    }

    /// Number of frequency bins produced per frame
    pub fn frequency_bin_count(&self) -> usize {
        self.window_size / 2
    }
}
