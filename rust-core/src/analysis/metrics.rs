//! Per-frame metrics derived from byte analysis windows

/// Loudness and dominant frequency for one frame
///
/// Both values are rounded to the nearest integer. Loudness lies in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricsSnapshot {
    pub loudness: f64,
    pub dominant_frequency_hz: f64,
}

impl MetricsSnapshot {
    /// Value shown while idle
    pub const ZERO: Self = Self {
        loudness: 0.0,
        dominant_frequency_hz: 0.0,
    };

    /// Compute both metrics from one frame's readouts
    ///
    /// # Arguments
    /// * `time_domain` - Unsigned 8-bit samples biased at 128
    /// * `frequency_bins` - Unsigned 8-bit magnitudes from 0 Hz to Nyquist
    /// * `sample_rate` - Stream sample rate in Hz
    /// * `window_size` - Samples per analysis frame (FFT size)
    pub fn from_frame(
        time_domain: &[u8],
        frequency_bins: &[u8],
        sample_rate: f64,
        window_size: usize,
    ) -> Self {
        Self {
            loudness: loudness(time_domain),
            dominant_frequency_hz: dominant_frequency(frequency_bins, sample_rate, window_size),
        }
    }
}

/// RMS of normalised amplitudes scaled to 0-100, rounded
///
/// `amplitude = (sample - 128) / 128`. An empty window is silent.
pub fn loudness(samples: &[u8]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f64 = samples
        .iter()
        .map(|&s| {
            let amplitude = (f64::from(s) - 128.0) / 128.0;
            amplitude * amplitude
        })
        .sum();

    ((sum_squares / samples.len() as f64).sqrt() * 100.0).round()
}

/// Index of the loudest bin; the lowest index wins ties
///
/// Only a strictly greater magnitude replaces the current maximum, which
/// starts at 0 on bin 0. An all-zero spectrum therefore reports bin 0.
pub fn dominant_bin(bins: &[u8]) -> usize {
    let mut max_value = 0u8;
    let mut max_index = 0;
    for (i, &value) in bins.iter().enumerate() {
        if value > max_value {
            max_value = value;
            max_index = i;
        }
    }
    max_index
}

/// Centre frequency of the loudest bin in Hz, rounded
pub fn dominant_frequency(bins: &[u8], sample_rate: f64, window_size: usize) -> f64 {
    if window_size == 0 {
        return 0.0;
    }
    (dominant_bin(bins) as f64 * sample_rate / window_size as f64).round()
}
