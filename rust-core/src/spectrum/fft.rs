//! FFT engine using realfft for real-valued signals
//!
//! Buffers are allocated once per engine so the per-frame path does not allocate

use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// FFT engine for real-valued signals
#[derive(Clone)]
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer (realfft uses it as scratch)
    input_buffer: Vec<f64>,

    /// Reusable output buffer (complex spectrum)
    output_buffer: Vec<Complex<f64>>,

    /// Reusable magnitude buffer
    magnitude_buffer: Vec<f64>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = r2c.make_input_vec();
        let output_buffer = r2c.make_output_vec();
        let magnitude_buffer = vec![0.0; output_buffer.len()];

        Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
            magnitude_buffer,
        }
    }

    /// Compute FFT and return magnitude spectrum
    ///
    /// # Arguments
    /// * `signal` - Input signal (will be zero-padded if shorter than fft_size)
    ///
    /// # Returns
    /// Magnitude spectrum |X[k]| for k = 0..=fft_size/2 (positive frequencies only)
    pub fn compute_magnitude(&mut self, signal: &[f64]) -> &[f64] {
        let copy_len = signal.len().min(self.fft_size);
        self.input_buffer[..copy_len].copy_from_slice(&signal[..copy_len]);
        self.input_buffer[copy_len..].fill(0.0);

        match self.r2c.process(&mut self.input_buffer, &mut self.output_buffer) {
            Ok(()) => {
                for (mag, c) in self.magnitude_buffer.iter_mut().zip(self.output_buffer.iter()) {
                    *mag = c.norm();
                }
            }
            Err(e) => {
                // Buffers come from the plan itself, so this only fires on a realfft bug
                log::error!("FFT processing failed: {}", e);
                self.magnitude_buffer.fill(0.0);
            }
        }

        &self.magnitude_buffer
    }
}
