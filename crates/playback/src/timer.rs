use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Repeating deadline. Dropping it is the cancellation: nothing fires afterwards.
#[derive(Debug)]
pub(crate) struct IntervalTimer {
    period: Duration,
    next_due: Instant,
}

impl IntervalTimer {
    pub(crate) fn start(now: Instant, period: Duration) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    pub(crate) fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Fires at most once per call. Periods missed while the host was busy
    /// collapse into this firing; the schedule keeps its phase.
    pub(crate) fn fire_if_due(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        let behind = now.duration_since(self.next_due);
        let skipped = behind.as_nanos() / self.period.as_nanos();
        let periods = u32::try_from(skipped + 1).unwrap_or(u32::MAX);
        self.next_due += self.period.saturating_mul(periods);
        true
    }
}
