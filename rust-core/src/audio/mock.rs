//! In-memory acquirer for exercising the analysis loop and lifecycle without hardware

use super::input::{AcquisitionError, Acquirer, StreamHandle};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Counters shared between a mock acquirer and every handle it hands out
#[derive(Default)]
pub struct MockLog {
    pub acquisitions: Cell<usize>,
    pub releases: Cell<usize>,
    pub live_handles: Cell<usize>,
}

pub struct MockAcquirer {
    pub log: Rc<MockLog>,
    pub feed: Rc<RefCell<VecDeque<f32>>>,
    pub fail_with: Option<AcquisitionError>,
    pub sample_rate: f64,
}

impl MockAcquirer {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            log: Rc::new(MockLog::default()),
            feed: Rc::new(RefCell::new(VecDeque::new())),
            fail_with: None,
            sample_rate,
        }
    }

    pub fn failing(error: AcquisitionError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::new(48000.0)
        }
    }

    /// Queue samples as if the device had captured them
    pub fn push(&self, samples: &[f32]) {
        self.feed.borrow_mut().extend(samples.iter().copied());
    }
}

impl Acquirer for MockAcquirer {
    type Handle = MockStream;

    fn acquire(&mut self) -> Result<MockStream, AcquisitionError> {
        self.log.acquisitions.set(self.log.acquisitions.get() + 1);
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.log.live_handles.set(self.log.live_handles.get() + 1);
        Ok(MockStream {
            log: Rc::clone(&self.log),
            feed: Rc::clone(&self.feed),
            sample_rate: self.sample_rate,
            released: false,
        })
    }
}

pub struct MockStream {
    log: Rc<MockLog>,
    feed: Rc<RefCell<VecDeque<f32>>>,
    sample_rate: f64,
    released: bool,
}

impl StreamHandle for MockStream {
    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn read(&mut self, buffer: &mut [f32]) -> usize {
        if self.released {
            return 0;
        }
        let mut feed = self.feed.borrow_mut();
        let n = buffer.len().min(feed.len());
        for (dst, src) in buffer.iter_mut().zip(feed.drain(..n)) {
            *dst = src;
        }
        n
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.log.releases.set(self.log.releases.get() + 1);
            self.log.live_handles.set(self.log.live_handles.get() - 1);
        }
    }

    fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for MockStream {
    fn drop(&mut self) {
        self.release();
    }
}
