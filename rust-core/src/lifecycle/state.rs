//! Recording state
//!
//! Two states only; which one the controller is in follows from whether it
//! holds a stream handle.

/// Recording state machine: `Idle <-> Recording`
///
/// Idle is both the initial state and the state after every stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
}

impl RecordingState {
    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
