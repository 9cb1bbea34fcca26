//! This crate provides a small timer state machine which can either count up or count down,
//! together with helpers to display second counts as minutes and seconds.
//!
//! The core of this library is the [timer::Timer] component. It is configured with a
//! [TimerConfig] which specifies the start time, the end time and the increment in seconds.
//! The direction of the timer is derived from these bounds: a start time larger than the end
//! time results in a countdown, otherwise the timer counts up. Every tick advances the current
//! time by the increment and calls a user supplied tick callback. Once the end time is reached
//! or crossed, the end callback is called and the timer stops. The timer can be started,
//! stopped, reset and restarted at any time.
//!
//! The timer does not own a clock. Periodic ticks are requested from an injected
//! [time::Scheduler] implementation, and the timer is advanced by calling
//! [timer::Timer::poll] on every turn of the owning event loop. Two schedulers are provided:
//!
//! - The [time::ManualScheduler], where time only passes when the driver says so. This is
//!   useful for tests and for `no_std` environments where the periodic signal is generated
//!   by a hardware timer.
//! - The [StdScheduler], which derives the number of elapsed periods from the
//!   [std::time::Instant] clock.
//!
//! It should be noted that the timer is not an accurate clock. Ticks are only performed when
//! the timer is polled, and the time value is only advanced in whole increments.
//!
//! # Threads
//!
//! With the `std` feature, the [thread::TimerThread] moves a timer into a dedicated thread
//! which polls it periodically. The timer is then controlled by sending
//! [thread::TimerCommand]s through a channel. All timer state is still only mutated by that
//! single thread.
//!
//! # Examples
//!
//! The countdown demo inside the `demos` folder runs a countdown on the command line and prints
//! the formatted remaining time on every tick:
//!
//! ```sh
//! cargo run --example countdown -- --start 90 --end 0
//! ```
#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

pub mod format;
#[cfg(feature = "std")]
pub mod thread;
pub mod time;
#[cfg(feature = "alloc")]
pub mod timer;

use derive_new::new;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "std")]
pub use std_mod::*;

pub use format::{get_time_min_sec, write_formatted_time, DEFAULT_SEPARATOR};
#[cfg(feature = "alloc")]
pub use format::get_formatted_time;

/// Configuration of a [timer::Timer].
///
/// ## Fields
///
/// * `start_time` - Time in seconds to start the timer from. The current time is set back to
///   this value on reset. Defaults to 10.
/// * `end_time` - Time in seconds at which the timer completes. Defaults to 0.
/// * `increment` - Number of seconds added on each tick, which is also the tick period.
///   Only the magnitude is used, the sign is derived from the start and end time. Must not be
///   zero. Defaults to 1.
/// * `infinite` - Whether the timer continues indefinitely. This is forced to [true] if the
///   start time is equal to the end time. Defaults to [false].
/// * `autostart` - Whether the timer is started on creation. Defaults to [false].
#[derive(Debug, Copy, Clone, PartialEq, Eq, new)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimerConfig {
    pub start_time: i64,
    pub end_time: i64,
    pub increment: i64,
    pub infinite: bool,
    pub autostart: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            start_time: 10,
            end_time: 0,
            increment: 1,
            infinite: false,
            autostart: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimerState {
    Stopped = 0,
    Running = 1,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum TimerError {
    /// A zero increment would result in a zero tick period.
    #[error("timer increment must not be zero")]
    ZeroIncrement,
}

#[cfg(feature = "std")]
pub mod std_mod {
    use core::time::Duration;
    use std::time::Instant;

    use crate::time::Scheduler;

    /// Schedule handle of the [StdScheduler].
    #[derive(Debug)]
    pub struct StdSchedule {
        period: Duration,
        started: Instant,
        delivered: u64,
    }

    impl StdSchedule {
        pub fn period(&self) -> Duration {
            self.period
        }
    }

    /// Simple implementation of the [Scheduler] trait assuming a standard runtime.
    ///
    /// The number of elapsed periods is calculated from the monotonic [Instant] clock, so
    /// periods are not lost if the schedule is polled late. They are delivered in one batch
    /// instead.
    #[derive(Debug, Default, Copy, Clone)]
    pub struct StdScheduler;

    impl Scheduler for StdScheduler {
        type Handle = StdSchedule;

        fn schedule(&mut self, period: Duration) -> Self::Handle {
            StdSchedule {
                period,
                started: Instant::now(),
                delivered: 0,
            }
        }

        fn cancel(&mut self, _handle: Self::Handle) {}

        fn pending_ticks(&mut self, handle: &mut Self::Handle) -> u32 {
            if handle.period.is_zero() {
                return 0;
            }
            let elapsed = handle.started.elapsed().as_nanos() / handle.period.as_nanos();
            let elapsed = u64::try_from(elapsed).unwrap_or(u64::MAX);
            let pending = elapsed.saturating_sub(handle.delivered);
            handle.delivered = elapsed;
            u32::try_from(pending).unwrap_or(u32::MAX)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use alloc::{boxed::Box, vec::Vec};
    use core::{
        sync::atomic::{AtomicU32, Ordering},
        time::Duration,
    };
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{
        time::Scheduler,
        timer::{EndCallback, TickCallback},
    };

    /// Records all tick values and the number of end notifications of a timer.
    #[derive(Default, Clone)]
    pub struct CallbackRecorder {
        ticks: Arc<Mutex<Vec<i64>>>,
        end_count: Arc<AtomicU32>,
    }

    impl CallbackRecorder {
        pub fn tick_callback(&self) -> TickCallback {
            let ticks = self.ticks.clone();
            Box::new(move |time: i64| ticks.lock().unwrap().push(time))
        }

        pub fn end_callback(&self) -> EndCallback {
            let end_count = self.end_count.clone();
            Box::new(move || {
                end_count.fetch_add(1, Ordering::Relaxed);
            })
        }

        pub fn ticks(&self) -> Vec<i64> {
            self.ticks.lock().unwrap().clone()
        }

        pub fn end_count(&self) -> u32 {
            self.end_count.load(Ordering::Relaxed)
        }
    }

    #[derive(Default)]
    pub struct StartStopRecord {
        pub started: Vec<i64>,
        pub stopped: Vec<i64>,
    }

    #[test]
    fn test_config_defaults() {
        let cfg = TimerConfig::default();
        assert_eq!(cfg.start_time, 10);
        assert_eq!(cfg.end_time, 0);
        assert_eq!(cfg.increment, 1);
        assert!(!cfg.infinite);
        assert!(!cfg.autostart);
    }

    #[test]
    fn test_config_new() {
        let cfg = TimerConfig::new(0, 60, 5, false, true);
        assert_eq!(
            cfg,
            TimerConfig {
                start_time: 0,
                end_time: 60,
                increment: 5,
                infinite: false,
                autostart: true,
            }
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            alloc::format!("{}", TimerError::ZeroIncrement),
            "timer increment must not be zero"
        );
    }

    #[test]
    fn test_std_scheduler_counts_elapsed_periods() {
        let mut scheduler = StdScheduler;
        let mut handle = scheduler.schedule(Duration::from_millis(50));
        assert_eq!(handle.period(), Duration::from_millis(50));
        std::thread::sleep(Duration::from_millis(120));
        assert!(scheduler.pending_ticks(&mut handle) >= 2);
        // Periods are only delivered once.
        assert!(scheduler.pending_ticks(&mut handle) <= 1);
        scheduler.cancel(handle);
    }

    #[test]
    fn test_std_scheduler_zero_period() {
        let mut scheduler = StdScheduler;
        let mut handle = scheduler.schedule(Duration::ZERO);
        assert_eq!(scheduler.pending_ticks(&mut handle), 0);
    }
}
