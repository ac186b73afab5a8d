//! Lock-free ring buffer for captured audio
//!
//! Carries mono samples from the device callback thread to the analysis side

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};

/// Audio ring buffer, split into producer and consumer ends before use
pub struct AudioRingBuffer {
    producer: HeapProducer<f32>,
    consumer: HeapConsumer<f32>,
}

impl AudioRingBuffer {
    /// Create new ring buffer with given capacity
    ///
    /// # Arguments
    /// * `capacity` - Buffer capacity in samples
    pub fn new(capacity: usize) -> Self {
        let rb = HeapRb::<f32>::new(capacity);
        let (producer, consumer) = rb.split();

        Self { producer, consumer }
    }

    /// Split into producer and consumer ends
    pub fn split(self) -> (AudioProducer, AudioConsumer) {
        (
            AudioProducer {
                producer: self.producer,
            },
            AudioConsumer {
                consumer: self.consumer,
            },
        )
    }
}

/// Producer end of audio ring buffer (for writing)
pub struct AudioProducer {
    producer: HeapProducer<f32>,
}

impl AudioProducer {
    /// Write one sample, dropping it when the buffer is full
    pub fn write_one(&mut self, sample: f32) -> bool {
        self.producer.push(sample).is_ok()
    }
}

/// Consumer end of audio ring buffer (for reading)
pub struct AudioConsumer {
    consumer: HeapConsumer<f32>,
}

impl AudioConsumer {
    /// Read samples from buffer
    ///
    /// # Returns
    /// Number of samples actually read (may be less if buffer doesn't have enough)
    pub fn read(&mut self, buffer: &mut [f32]) -> usize {
        self.consumer.pop_slice(buffer)
    }
}
