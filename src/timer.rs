//! # Timer State Machine Module
//!
//! The [Timer] tracks an elapsed or remaining time value which is advanced by a fixed
//! increment on every tick. Whether the timer counts up or counts down is determined once at
//! construction by comparing the start time with the end time:
//!
//! 1. `start_time < end_time`: the increment is positive and the timer completes once the
//!    current time reaches or exceeds the end time.
//! 2. `start_time > end_time`: the increment is negative and the timer completes once the
//!    current time reaches or falls below the end time.
//! 3. `start_time == end_time`: the timer counts up and never completes.
//!
//! Ticks are driven by an injected [Scheduler]. The owner calls [Timer::poll] on every
//! callback turn of its event loop. The timer then retrieves the number of elapsed periods
//! from the scheduler and performs the corresponding ticks. The scheduling is best effort,
//! so the timer is not an accurate clock.
use alloc::boxed::Box;
use core::{fmt, time::Duration};

use crate::{time::Scheduler, TimerConfig, TimerError, TimerState};

/// Callback invoked with the new current time after every tick.
pub type TickCallback = Box<dyn FnMut(i64) + Send>;
/// Callback invoked once the timer reaches its end time.
pub type EndCallback = Box<dyn FnMut() + Send>;

pub struct Timer<S: Scheduler> {
    start_time: i64,
    end_time: i64,
    increment: i64,
    infinite: bool,
    autostart: bool,
    current_time: i64,
    schedule: Option<S::Handle>,
    scheduler: S,
    on_tick: TickCallback,
    on_end: EndCallback,
}

impl<S: Scheduler> Timer<S> {
    /// Create a timer with no-op tick and end callbacks.
    pub fn new(cfg: TimerConfig, scheduler: S) -> Result<Self, TimerError> {
        Self::new_with_callbacks(cfg, scheduler, Box::new(|_: i64| {}), Box::new(|| {}))
    }

    /// Create a new timer.
    ///
    /// The sign of the configured increment is ignored and derived from the relation between
    /// start and end time. If [TimerConfig::autostart] is set, the timer is started before
    /// returning.
    pub fn new_with_callbacks(
        cfg: TimerConfig,
        scheduler: S,
        on_tick: TickCallback,
        on_end: EndCallback,
    ) -> Result<Self, TimerError> {
        if cfg.increment == 0 {
            return Err(TimerError::ZeroIncrement);
        }
        let magnitude = cfg.increment.saturating_abs();
        let (increment, infinite) = if cfg.start_time <= cfg.end_time {
            (magnitude, cfg.infinite || cfg.start_time == cfg.end_time)
        } else {
            (-magnitude, cfg.infinite)
        };
        let mut timer = Self {
            start_time: cfg.start_time,
            end_time: cfg.end_time,
            increment,
            infinite,
            autostart: cfg.autostart,
            current_time: cfg.start_time,
            schedule: None,
            scheduler,
            on_tick,
            on_end,
        };
        if timer.autostart {
            timer.start();
        }
        Ok(timer)
    }

    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    pub fn end_time(&self) -> i64 {
        self.end_time
    }

    /// Signed increment applied on every tick.
    pub fn increment(&self) -> i64 {
        self.increment
    }

    pub fn infinite(&self) -> bool {
        self.infinite
    }

    pub fn autostart(&self) -> bool {
        self.autostart
    }

    pub fn current_time(&self) -> i64 {
        self.current_time
    }

    pub fn state(&self) -> TimerState {
        if self.schedule.is_some() {
            return TimerState::Running;
        }
        TimerState::Stopped
    }

    pub fn is_running(&self) -> bool {
        self.state() == TimerState::Running
    }

    /// Period between two ticks, which is the magnitude of the increment in seconds.
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.increment.unsigned_abs())
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn set_on_tick(&mut self, on_tick: TickCallback) {
        self.on_tick = on_tick;
    }

    pub fn set_on_end(&mut self, on_end: EndCallback) {
        self.on_end = on_end;
    }

    /// Start the timer. See [Self::start_with_cb].
    pub fn start(&mut self) {
        self.start_with_cb(|_| {})
    }

    /// Start the timer at any moment, which can also be used to resume the timer after a stop.
    ///
    /// This is a no-op if the timer is already running, so only one periodic schedule exists
    /// at any time. Otherwise, the callback is invoked with the current time.
    pub fn start_with_cb(&mut self, cb: impl FnOnce(i64)) {
        if self.schedule.is_some() {
            log::trace!("timer already running, ignoring start request");
            return;
        }
        self.schedule = Some(self.scheduler.schedule(self.period()));
        log::debug!(
            "timer started at {} with period {:?}",
            self.current_time,
            self.period()
        );
        cb(self.current_time);
    }

    /// Stop the timer. See [Self::stop_with_cb].
    pub fn stop(&mut self) {
        self.stop_with_cb(|_| {})
    }

    /// Stop the timer and invoke the callback with the current time. It is safe to call this
    /// when the timer is not running.
    pub fn stop_with_cb(&mut self, cb: impl FnOnce(i64)) {
        if let Some(handle) = self.schedule.take() {
            self.scheduler.cancel(handle);
            log::debug!("timer stopped at {}", self.current_time);
        }
        cb(self.current_time);
    }

    /// Reset the timer. See [Self::reset_with_cb].
    pub fn reset(&mut self) {
        self.reset_with_cb(|_| {})
    }

    /// Set the current time back to the start time and invoke the callback with it.
    ///
    /// A running timer keeps running.
    pub fn reset_with_cb(&mut self, cb: impl FnOnce(i64)) {
        self.current_time = self.start_time;
        log::debug!("timer reset to {}", self.current_time);
        cb(self.current_time);
    }

    /// Perform all ticks which became due since the last call. This should be called on every
    /// turn of the event loop which owns the timer.
    ///
    /// Returns the number of performed ticks. Remaining due ticks are discarded if one of the
    /// ticks completes the timer.
    pub fn poll(&mut self) -> u32 {
        let due = match self.schedule.as_mut() {
            Some(handle) => self.scheduler.pending_ticks(handle),
            None => return 0,
        };
        let mut performed = 0;
        while performed < due && self.schedule.is_some() {
            self.tick();
            performed += 1;
        }
        performed
    }

    fn tick(&mut self) {
        self.current_time = self.current_time.saturating_add(self.increment);
        log::trace!("timer tick, current time {}", self.current_time);
        (self.on_tick)(self.current_time);

        if self.infinite {
            return;
        }
        let reached_end = if self.start_time <= self.end_time {
            self.current_time >= self.end_time
        } else {
            self.current_time <= self.end_time
        };
        if reached_end {
            log::debug!("timer reached end time {}", self.end_time);
            (self.on_end)();
            self.stop();
        }
    }
}

impl<S: Scheduler> fmt::Debug for Timer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("start_time", &self.start_time)
            .field("end_time", &self.end_time)
            .field("increment", &self.increment)
            .field("infinite", &self.infinite)
            .field("autostart", &self.autostart)
            .field("current_time", &self.current_time)
            .field("schedule", &self.schedule)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}
