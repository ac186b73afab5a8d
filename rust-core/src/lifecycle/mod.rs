//! Recording lifecycle: state machine, cancellation and frame pacing

pub mod cancel;
pub mod clock;
pub mod controller;
pub mod driver;
pub mod state;

pub use cancel::CancelToken;
pub use clock::{FrameClock, IntervalClock};
pub use controller::{FrameTicket, LifecycleController, Readout};
pub use driver::{run_frames, Command};
pub use state::RecordingState;
