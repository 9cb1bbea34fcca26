//! Runs a [Timer] inside a dedicated thread.
//!
//! The [TimerThread] owns the timer and polls it after every wake-up. Wake-ups happen when a
//! [TimerCommand] is received, or after the configured poll interval elapsed without any
//! command. The poll interval should be noticeably shorter than the tick period of the timer,
//! otherwise ticks are delivered late and in batches.
use std::{
    sync::mpsc::{self, RecvTimeoutError},
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::{time::Scheduler, timer::Timer, StdScheduler};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimerCommand {
    Start,
    Stop,
    Reset,
    /// Terminate the thread and hand back the timer.
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TimerThreadError {
    #[error("timer thread disconnected")]
    Disconnected,
    #[error("timer thread panicked")]
    Panicked,
    #[error("spawning timer thread failed: {0}")]
    Spawn(#[from] std::io::Error),
}

pub struct TimerThread<S: Scheduler = StdScheduler> {
    cmd_tx: mpsc::Sender<TimerCommand>,
    join_handle: JoinHandle<Timer<S>>,
}

impl<S> TimerThread<S>
where
    S: Scheduler + Send + 'static,
    S::Handle: Send,
{
    /// Move the timer into a new thread named `timer`.
    pub fn spawn(mut timer: Timer<S>, poll_interval: Duration) -> Result<Self, TimerThreadError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let join_handle = thread::Builder::new()
            .name("timer".into())
            .spawn(move || {
                loop {
                    match cmd_rx.recv_timeout(poll_interval) {
                        Ok(TimerCommand::Start) => timer.start(),
                        Ok(TimerCommand::Stop) => timer.stop(),
                        Ok(TimerCommand::Reset) => timer.reset(),
                        Ok(TimerCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                            break
                        }
                        Err(RecvTimeoutError::Timeout) => (),
                    }
                    timer.poll();
                }
                log::debug!("timer thread terminating at {}", timer.current_time());
                timer
            })?;
        Ok(Self {
            cmd_tx,
            join_handle,
        })
    }

    pub fn send(&self, cmd: TimerCommand) -> Result<(), TimerThreadError> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| TimerThreadError::Disconnected)
    }

    pub fn start(&self) -> Result<(), TimerThreadError> {
        self.send(TimerCommand::Start)
    }

    pub fn stop(&self) -> Result<(), TimerThreadError> {
        self.send(TimerCommand::Stop)
    }

    pub fn reset(&self) -> Result<(), TimerThreadError> {
        self.send(TimerCommand::Reset)
    }

    /// The thread only finishes on its own if one of the timer callbacks panicked.
    pub fn is_finished(&self) -> bool {
        self.join_handle.is_finished()
    }

    /// Stop the thread and return the timer. The running state of the timer is not touched,
    /// so the caller may continue to poll it.
    pub fn shutdown(self) -> Result<Timer<S>, TimerThreadError> {
        // A failed send means the thread is already gone, which the join reports.
        let _ = self.cmd_tx.send(TimerCommand::Shutdown);
        self.join_handle
            .join()
            .map_err(|_| TimerThreadError::Panicked)
    }
}
