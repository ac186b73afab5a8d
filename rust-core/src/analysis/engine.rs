//! Analysis loop over a live stream
//!
//! Each frame drains newly captured samples into the analyser window, reads
//! the byte time-domain and frequency readouts, and derives one
//! `MetricsSnapshot`.

use super::metrics::MetricsSnapshot;
use crate::audio::StreamHandle;
use crate::lifecycle::CancelToken;
use crate::spectrum::ByteAnalyser;
use std::iter::FusedIterator;

/// Samples moved from the stream per read
const READ_CHUNK: usize = 1024;

/// A live stream paired with the analyser that turns it into metrics
pub struct AnalysisContext<H: StreamHandle> {
    handle: H,
    analyser: ByteAnalyser,
    sample_rate: f64,
    read_buffer: Vec<f32>,
    time_domain: Vec<u8>,
    frequency_bins: Vec<u8>,
}

impl<H: StreamHandle> AnalysisContext<H> {
    /// The analyser's window is cleared so no audio from a previous session leaks in
    pub fn new(handle: H, mut analyser: ByteAnalyser) -> Self {
        analyser.reset();
        let sample_rate = handle.sample_rate();
        let window_size = analyser.window_size();
        let bin_count = analyser.frequency_bin_count();

        Self {
            handle,
            analyser,
            sample_rate,
            read_buffer: vec![0.0; READ_CHUNK],
            time_domain: vec![0; window_size],
            frequency_bins: vec![0; bin_count],
        }
    }

    /// Run one frame of analysis
    pub fn analyse_frame(&mut self) -> MetricsSnapshot {
        self.pull_samples();

        self.analyser.byte_time_domain_data(&mut self.time_domain);
        self.analyser.byte_frequency_data(&mut self.frequency_bins);

        MetricsSnapshot::from_frame(
            &self.time_domain,
            &self.frequency_bins,
            self.sample_rate,
            self.analyser.window_size(),
        )
    }

    /// Drain everything the stream has captured since the last frame
    fn pull_samples(&mut self) {
        let mut total = 0;
        loop {
            let n = self.handle.read(&mut self.read_buffer);
            if n == 0 {
                break;
            }
            self.analyser.push_samples(&self.read_buffer[..n]);
            total += n;
            if n < self.read_buffer.len() {
                break;
            }
        }
        log::trace!("Pulled {} samples", total);
    }

    /// Sample rate fixed at stream-open time (Hz)
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Samples per analysis frame
    pub fn window_size(&self) -> usize {
        self.analyser.window_size()
    }

    /// Give up the stream handle, e.g. to release it
    pub fn into_handle(self) -> H {
        self.handle
    }
}

/// Lazy, unbounded sequence of per-frame metrics
///
/// Yields one snapshot per `next()` call until its token is cancelled, then
/// yields `None` forever. A cancelled engine cannot be restarted.
pub struct AnalysisEngine<H: StreamHandle> {
    context: AnalysisContext<H>,
    token: CancelToken,
}

impl<H: StreamHandle> AnalysisEngine<H> {
    pub fn new(context: AnalysisContext<H>, token: CancelToken) -> Self {
        Self { context, token }
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Stop producing frames
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn context(&self) -> &AnalysisContext<H> {
        &self.context
    }

    pub fn into_handle(self) -> H {
        self.context.into_handle()
    }
}

impl<H: StreamHandle> Iterator for AnalysisEngine<H> {
    type Item = MetricsSnapshot;

    fn next(&mut self) -> Option<MetricsSnapshot> {
        if self.token.is_cancelled() {
            return None;
        }
        Some(self.context.analyse_frame())
    }
}

impl<H: StreamHandle> FusedIterator for AnalysisEngine<H> {}
