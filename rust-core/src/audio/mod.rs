//! Audio input acquisition with cpal

pub mod buffer;
pub mod input;

#[cfg(test)]
pub(crate) mod mock;

pub use buffer::AudioRingBuffer;
pub use input::{AcquisitionError, Acquirer, CpalAcquirer, CpalStream, StreamHandle};
