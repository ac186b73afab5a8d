//! Spectral analysis with FFT

pub mod analyser;
pub mod fft;
pub mod windowing;

pub use analyser::ByteAnalyser;
pub use fft::FftEngine;
pub use windowing::WindowType;
