//! Byte-oriented real-time analyser
//!
//! Holds the most recent analysis window of mono samples and exposes it as
//! 8-bit time-domain and frequency-domain readouts, refreshed on demand.

use super::fft::FftEngine;
use super::windowing::{apply_window_inplace, generate_window};
use crate::config::{AnalyzerConfig, ConfigError};

/// Time-domain byte value representing silence
pub const SILENCE_BYTE: u8 = 128;

/// Real-time analyser over a circular sample window
#[derive(Clone)]
pub struct ByteAnalyser {
    config: AnalyzerConfig,
    fft_engine: FftEngine,

    /// Precomputed window coefficients
    window: Vec<f64>,

    /// Circular buffer of the latest `window_size` samples
    time_buffer: Vec<f32>,

    /// Next write position in `time_buffer` (also the oldest sample)
    write_pos: usize,

    /// Scratch frame: unrolled and windowed copy of `time_buffer`
    frame: Vec<f64>,

    /// Magnitudes smoothed over time, one per output bin
    smoothed: Vec<f64>,
}

impl ByteAnalyser {
    /// Create new analyser
    pub fn new(config: AnalyzerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let n = config.window_size;
        Ok(Self {
            fft_engine: FftEngine::new(n),
            window: generate_window(config.window_type, n),
            time_buffer: vec![0.0; n],
            write_pos: 0,
            frame: vec![0.0; n],
            smoothed: vec![0.0; config.frequency_bin_count()],
            config,
        })
    }

    /// Append mono samples, overwriting the oldest ones
    pub fn push_samples(&mut self, samples: &[f32]) {
        let n = self.time_buffer.len();

        if samples.len() >= n {
            self.time_buffer.copy_from_slice(&samples[samples.len() - n..]);
            self.write_pos = 0;
            return;
        }

        let first = samples.len().min(n - self.write_pos);
        self.time_buffer[self.write_pos..self.write_pos + first].copy_from_slice(&samples[..first]);
        let rest = samples.len() - first;
        self.time_buffer[..rest].copy_from_slice(&samples[first..]);
        self.write_pos = (self.write_pos + samples.len()) % n;
    }

    /// Write the current window as unsigned bytes biased at 128, oldest first
    ///
    /// Writes `min(out.len(), window_size)` values.
    pub fn byte_time_domain_data(&self, out: &mut [u8]) {
        for (dst, sample) in out.iter_mut().zip(self.samples_oldest_first()) {
            *dst = (128.0 * (f64::from(sample) + 1.0)).floor().clamp(0.0, 255.0) as u8;
        }
    }

    /// Write the current magnitude spectrum as bytes spanning 0 Hz to Nyquist
    ///
    /// Each call advances the temporal smoothing by one step. Writes
    /// `min(out.len(), window_size / 2)` values.
    pub fn byte_frequency_data(&mut self, out: &mut [u8]) {
        self.refresh_spectrum();

        let min_db = self.config.min_decibels;
        let scale = 255.0 / (self.config.max_decibels - min_db);

        for (dst, &mag) in out.iter_mut().zip(self.smoothed.iter()) {
            let db = 20.0 * mag.log10();
            *dst = (scale * (db - min_db)).floor().clamp(0.0, 255.0) as u8;
        }
    }

    fn refresh_spectrum(&mut self) {
        let n = self.time_buffer.len();
        let (newer, older) = self.time_buffer.split_at(self.write_pos);
        for (dst, &s) in self.frame.iter_mut().zip(older.iter().chain(newer.iter())) {
            *dst = f64::from(s);
        }
        apply_window_inplace(&mut self.frame, &self.window);

        let tau = self.config.smoothing_time_constant;
        let norm = 1.0 / n as f64;
        let magnitudes = self.fft_engine.compute_magnitude(&self.frame);

        for (smoothed, &mag) in self.smoothed.iter_mut().zip(magnitudes.iter()) {
            let next = tau * *smoothed + (1.0 - tau) * mag * norm;
            *smoothed = if next.is_finite() { next } else { 0.0 };
        }
    }

    fn samples_oldest_first(&self) -> impl Iterator<Item = f32> + '_ {
        let (newer, older) = self.time_buffer.split_at(self.write_pos);
        older.iter().chain(newer.iter()).copied()
    }

    /// Clear the sample window and the smoothing history
    pub fn reset(&mut self) {
        self.time_buffer.fill(0.0);
        self.smoothed.fill(0.0);
        self.write_pos = 0;
    }

    /// Samples per analysis frame
    pub fn window_size(&self) -> usize {
        self.config.window_size
    }

    /// Number of bins in the frequency readout
    pub fn frequency_bin_count(&self) -> usize {
        self.smoothed.len()
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn analyser(window_size: usize, smoothing: f64) -> ByteAnalyser {
        ByteAnalyser::new(AnalyzerConfig {
            window_size,
            smoothing_time_constant: smoothing,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_silence_reads_as_bias() {
        let analyser = analyser(2048, 0.8);
        let mut out = vec![0u8; 2048];
        analyser.byte_time_domain_data(&mut out);
        assert!(out.iter().all(|&b| b == SILENCE_BYTE));
    }

    #[test]
    fn test_time_domain_byte_mapping_and_order() {
        let mut analyser = analyser(32, 0.8);
        let mut samples = vec![0.0f32; 32];
        samples[0] = -1.0;
        samples[1] = 1.0;
        samples[2] = 0.5;
        samples[31] = 2.0;
        analyser.push_samples(&samples);

        let mut out = vec![0u8; 32];
        analyser.byte_time_domain_data(&mut out);
        assert_eq!(out[0], 0);
        assert_eq!(out[1], 255); // 256 clamps
        assert_eq!(out[2], 192);
        assert_eq!(out[31], 255);
    }

    #[test]
    fn test_circular_window_keeps_latest_samples() {
        let mut analyser = analyser(32, 0.8);
        analyser.push_samples(&[0.5; 20]);
        analyser.push_samples(&[-0.5; 20]);

        let mut out = vec![0u8; 32];
        analyser.byte_time_domain_data(&mut out);

        // 12 of the first batch survive, followed by the 20 newest samples
        assert!(out[..12].iter().all(|&b| b == 192));
        assert!(out[12..].iter().all(|&b| b == 64));
    }

    #[test]
    fn test_oversized_push_keeps_tail() {
        let mut analyser = analyser(32, 0.8);
        let samples: Vec<f32> = (0..100).map(|i| if i < 68 { -1.0 } else { 0.0 }).collect();
        analyser.push_samples(&samples);

        let mut out = vec![0u8; 32];
        analyser.byte_time_domain_data(&mut out);
        assert!(out.iter().all(|&b| b == SILENCE_BYTE));
    }

    #[test]
    fn test_silent_spectrum_is_zero() {
        let mut analyser = analyser(2048, 0.8);
        let mut out = vec![7u8; 1024];
        analyser.byte_frequency_data(&mut out);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_tone_peaks_at_its_bin() {
        let sample_rate = 48000.0;
        let n = 2048;
        let bin = 43; // ~1008 Hz
        let freq = bin as f64 * sample_rate / n as f64;

        let mut analyser = analyser(n, 0.0);
        let signal: Vec<f32> = (0..n)
            .map(|i| (0.5 * (2.0 * PI * freq * i as f64 / sample_rate).sin()) as f32)
            .collect();
        analyser.push_samples(&signal);

        let mut out = vec![0u8; analyser.frequency_bin_count()];
        analyser.byte_frequency_data(&mut out);

        let peak = out.iter().copied().max().unwrap();
        let first_peak = out.iter().position(|&b| b == peak).unwrap();
        assert!((first_peak as i64 - bin as i64).abs() <= 1);
        assert!(peak > 200);
    }

    #[test]
    fn test_smoothing_decays_gradually() {
        let n = 256;
        let mut analyser = analyser(n, 0.8);
        let signal: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * 16.0 * i as f64 / n as f64).sin() as f32)
            .collect();
        analyser.push_samples(&signal);

        let mut loud = vec![0u8; n / 2];
        analyser.byte_frequency_data(&mut loud);

        analyser.push_samples(&vec![0.0; n]);
        let mut after = vec![0u8; n / 2];
        analyser.byte_frequency_data(&mut after);

        // Smoothed energy is still present one frame after the tone stops
        assert!(after[16] > 0);

        analyser.reset();
        analyser.byte_frequency_data(&mut after);
        assert!(after.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = ByteAnalyser::new(AnalyzerConfig {
            window_size: 1000,
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
