//! Single-threaded frame loop
//!
//! Interleaves operator commands with frame scheduling. The next frame is
//! requested at the end of each iteration and fires on the following one,
//! after commands are applied, so a stop issued in between turns it into a
//! stale no-op.

use super::clock::FrameClock;
use super::controller::{FrameTicket, LifecycleController};
use crate::audio::Acquirer;
use std::sync::mpsc::{Receiver, TryRecvError};

/// Operator actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Toggle,
    Quit,
}

/// Drive the controller until `Quit` arrives or the command sender goes away
///
/// `present` runs once per frame after the analysis step. Returns the number
/// of frames that produced a snapshot.
pub fn run_frames<A, C, P>(
    controller: &mut LifecycleController<A>,
    clock: &mut C,
    commands: &Receiver<Command>,
    mut present: P,
) -> usize
where
    A: Acquirer,
    C: FrameClock,
    P: FnMut(&LifecycleController<A>),
{
    let mut pending: Option<FrameTicket> = None;
    let mut analysed = 0;

    loop {
        clock.wait_for_frame();

        loop {
            let command = match commands.try_recv() {
                Ok(command) => command,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return analysed,
            };
            log::debug!("Command: {:?}", command);
            // Start failures are logged by the controller and leave it idle
            let _ = match command {
                Command::Start => controller.start(),
                Command::Stop => {
                    controller.stop();
                    Ok(())
                }
                Command::Toggle => controller.toggle(),
                Command::Quit => return analysed,
            };
        }

        if let Some(ticket) = pending.take() {
            if controller.on_frame(&ticket).is_some() {
                analysed += 1;
            }
        }
        pending = controller.request_frame();

        present(controller);
    }
}
