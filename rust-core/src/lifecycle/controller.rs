//! Recording lifecycle
//!
//! Owns the stream handle for the duration of a session, runs the analysis
//! engine one frame at a time, and publishes every change on a single
//! update channel.
//!
//! ```text
//!          start() [acquire ok]
//!   Idle ─────────────────────────▶ Recording
//!    ▲                                  │
//!    └──────────────────────────────────┘
//!      stop() / drop: cancel, release, zero metrics
//! ```

use super::cancel::CancelToken;
use super::state::RecordingState;
use crate::analysis::{AnalysisContext, AnalysisEngine, MetricsSnapshot};
use crate::audio::{AcquisitionError, Acquirer};
use crate::config::{AnalyzerConfig, ConfigError};
use crate::spectrum::ByteAnalyser;
use std::sync::mpsc::{self, Receiver, Sender};

/// What the presentation layer shows: button state plus two readouts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readout {
    pub state: RecordingState,
    pub metrics: MetricsSnapshot,
}

/// Permission to run one frame of the session that issued it
///
/// A ticket whose session has stopped is inert, even if a newer session is
/// running by the time it fires.
#[derive(Debug, Clone)]
pub struct FrameTicket {
    token: CancelToken,
}

impl FrameTicket {
    pub fn is_stale(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Start/stop controller for one microphone
pub struct LifecycleController<A: Acquirer> {
    acquirer: A,

    /// Validated analyser cloned into each new session
    analyser: ByteAnalyser,

    /// Present exactly while recording
    engine: Option<AnalysisEngine<A::Handle>>,

    metrics: MetricsSnapshot,
    updates: Sender<Readout>,
}

impl<A: Acquirer> LifecycleController<A> {
    /// Create an idle controller and the receiving end of its update channel
    pub fn new(acquirer: A, config: AnalyzerConfig) -> Result<(Self, Receiver<Readout>), ConfigError> {
        let analyser = ByteAnalyser::new(config)?;
        let (updates, receiver) = mpsc::channel();

        let controller = Self {
            acquirer,
            analyser,
            engine: None,
            metrics: MetricsSnapshot::ZERO,
            updates,
        };

        Ok((controller, receiver))
    }

    /// Current state; `Recording` exactly when a stream handle is held
    pub fn state(&self) -> RecordingState {
        if self.engine.is_some() {
            RecordingState::Recording
        } else {
            RecordingState::Idle
        }
    }

    /// Latest snapshot (zero while idle)
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics
    }

    pub fn readout(&self) -> Readout {
        Readout {
            state: self.state(),
            metrics: self.metrics,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        self.analyser.config()
    }

    /// Sample rate of the live stream, if recording
    pub fn sample_rate(&self) -> Option<f64> {
        self.engine.as_ref().map(|e| e.context().sample_rate())
    }

    /// Acquire the microphone and begin a session
    ///
    /// No-op while already recording. On failure the controller stays idle,
    /// the error is logged once and returned so the caller may retry.
    pub fn start(&mut self) -> Result<(), AcquisitionError> {
        if self.engine.is_some() {
            log::debug!("start() ignored: already recording");
            return Ok(());
        }

        let handle = match self.acquirer.acquire() {
            Ok(handle) => handle,
            Err(e) => {
                log::error!("Error accessing microphone: {}", e);
                return Err(e);
            }
        };

        let context = AnalysisContext::new(handle, self.analyser.clone());
        log::info!(
            "Recording started ({} Hz, window {})",
            context.sample_rate(),
            context.window_size()
        );
        self.engine = Some(AnalysisEngine::new(context, CancelToken::new()));
        self.publish();
        Ok(())
    }

    /// End the session: cancel pending frames, release the device, zero the metrics
    ///
    /// No-op while idle.
    pub fn stop(&mut self) {
        let Some(engine) = self.engine.take() else {
            return;
        };

        engine.cancel();
        let mut handle = engine.into_handle();
        self.acquirer.release(&mut handle);
        drop(handle);

        self.metrics = MetricsSnapshot::ZERO;
        log::info!("Recording stopped");
        self.publish();
    }

    /// Start when idle, stop when recording
    pub fn toggle(&mut self) -> Result<(), AcquisitionError> {
        match self.state() {
            RecordingState::Idle => self.start(),
            RecordingState::Recording => {
                self.stop();
                Ok(())
            }
        }
    }

    /// Schedule the next frame of the current session (`None` while idle)
    pub fn request_frame(&self) -> Option<FrameTicket> {
        self.engine.as_ref().map(|engine| FrameTicket {
            token: engine.token().clone(),
        })
    }

    /// Run a scheduled frame
    ///
    /// Returns the new snapshot, or `None` without touching any state when
    /// the ticket is stale or the controller is idle.
    pub fn on_frame(&mut self, ticket: &FrameTicket) -> Option<MetricsSnapshot> {
        if ticket.is_stale() {
            log::trace!("Dropping stale frame");
            return None;
        }

        let snapshot = self.engine.as_mut()?.next()?;
        self.metrics = snapshot;
        self.publish();
        Some(snapshot)
    }

    fn publish(&self) {
        // Nobody listening is fine; the getters still reflect the state
        let _ = self.updates.send(self.readout());
    }
}

impl<A: Acquirer> Drop for LifecycleController<A> {
    fn drop(&mut self) {
        self.stop();
    }
}
