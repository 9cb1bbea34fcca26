use core::{fmt::Debug, time::Duration};

use smallvec::SmallVec;

/// Generic abstraction for a host facility which repeatedly signals that a fixed period has
/// elapsed.
///
/// The scheduler never calls back into the timer itself. Instead, the owner of a schedule asks
/// for the number of periods which elapsed since the last query by calling
/// [Scheduler::pending_ticks] on every callback turn. This keeps the timer state machine free
/// of shared ownership and makes it possible to drive it manually, for example with the
/// [ManualScheduler].
pub trait Scheduler: Debug {
    type Handle: Debug;

    /// Begin a new periodic schedule. The first period starts now.
    fn schedule(&mut self, period: Duration) -> Self::Handle;

    /// Cancel a schedule. Pending, not yet retrieved periods are discarded.
    fn cancel(&mut self, handle: Self::Handle);

    /// Retrieve and clear the number of periods which elapsed for the given schedule since the
    /// last call.
    fn pending_ticks(&mut self, handle: &mut Self::Handle) -> u32;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct ManualEntry {
    id: u32,
    pending: u32,
}

/// Handle of a schedule created by the [ManualScheduler].
#[derive(Debug, PartialEq, Eq)]
pub struct ManualSchedule {
    id: u32,
}

/// Scheduler where time only passes when the driver calls [ManualScheduler::fire].
///
/// Useful for tests and for environments where the periodic signal comes from elsewhere, for
/// example a hardware timer interrupt which only sets a flag.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u32,
    entries: SmallVec<[ManualEntry; 2]>,
    last_period: Option<Duration>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let the given number of periods elapse for every active schedule.
    pub fn fire(&mut self, periods: u32) {
        for entry in self.entries.iter_mut() {
            entry.pending = entry.pending.saturating_add(periods);
        }
    }

    /// Number of schedules which were created and not cancelled yet.
    pub fn active_schedules(&self) -> usize {
        self.entries.len()
    }

    /// Period of the most recently created schedule.
    pub fn last_period(&self) -> Option<Duration> {
        self.last_period
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualSchedule;

    fn schedule(&mut self, period: Duration) -> Self::Handle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(ManualEntry { id, pending: 0 });
        self.last_period = Some(period);
        ManualSchedule { id }
    }

    fn cancel(&mut self, handle: Self::Handle) {
        self.entries.retain(|entry| entry.id != handle.id);
    }

    fn pending_ticks(&mut self, handle: &mut Self::Handle) -> u32 {
        match self.entries.iter_mut().find(|entry| entry.id == handle.id) {
            Some(entry) => core::mem::take(&mut entry.pending),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_and_fire() {
        let mut scheduler = ManualScheduler::new();
        let mut handle = scheduler.schedule(Duration::from_secs(2));
        assert_eq!(scheduler.active_schedules(), 1);
        assert_eq!(scheduler.last_period(), Some(Duration::from_secs(2)));
        assert_eq!(scheduler.pending_ticks(&mut handle), 0);
        scheduler.fire(3);
        assert_eq!(scheduler.pending_ticks(&mut handle), 3);
        assert_eq!(scheduler.pending_ticks(&mut handle), 0);
    }

    #[test]
    fn test_cancel_discards_pending() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule(Duration::from_secs(1));
        scheduler.fire(1);
        scheduler.cancel(handle);
        assert_eq!(scheduler.active_schedules(), 0);
        let mut stale = ManualSchedule { id: 0 };
        assert_eq!(scheduler.pending_ticks(&mut stale), 0);
    }

    #[test]
    fn test_fire_reaches_all_schedules() {
        let mut scheduler = ManualScheduler::new();
        let mut first = scheduler.schedule(Duration::from_secs(1));
        let mut second = scheduler.schedule(Duration::from_secs(5));
        assert_ne!(first, second);
        scheduler.fire(2);
        assert_eq!(scheduler.pending_ticks(&mut first), 2);
        assert_eq!(scheduler.pending_ticks(&mut second), 2);
        scheduler.cancel(first);
        assert_eq!(scheduler.active_schedules(), 1);
        assert_eq!(scheduler.last_period(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_fire_without_schedules() {
        let mut scheduler = ManualScheduler::new();
        scheduler.fire(10);
        assert_eq!(scheduler.active_schedules(), 0);
        assert_eq!(scheduler.last_period(), None);
    }
}
