use std::time::{Duration, Instant};

pub const TIMER_DEC_PER_SECOND: u32 = 60;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self { count: init_count }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    pub fn tick(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        true
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    pub delay: Timer,
    pub sound: Timer,
}

impl Timers {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn tick(&mut self) {
        self.delay.tick();
        self.sound.tick();
    }
}

/// Turns elapsed wall-clock time into a number of events due at a fixed rate.
/// Backlog past `max_backlog` is dropped.
#[derive(Debug, Clone)]
pub struct Pacer {
    period: Duration,
    last: Instant,
    max_backlog: u32,
}

impl Pacer {
    pub fn new(hz: u32) -> Self {
        Self::starting_at(hz, Instant::now())
    }

    pub fn starting_at(hz: u32, start: Instant) -> Self {
        let hz = hz.max(1);
        Self {
            period: Duration::from_secs(1) / hz,
            last: start,
            // at most a quarter second of catch-up
            max_backlog: (hz / 4).max(1),
        }
    }

    pub fn due(&mut self) -> u32 {
        self.due_at(Instant::now())
    }

    pub fn due_at(&mut self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.last);
        let due = (elapsed.as_nanos() / self.period.as_nanos().max(1)) as u64;
        if due > self.max_backlog as u64 {
            self.last = now;
            return self.max_backlog;
        }
        let due = due as u32;
        self.last += self.period * due;
        due
    }

    pub fn reset(&mut self) {
        self.last = Instant::now();
    }
}
