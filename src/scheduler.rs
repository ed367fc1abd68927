use std::time::Duration;

use tracing::trace;

/// Repeating fixed-interval timer fed with frame deltas.
///
/// There is exactly one timer per scheduler, so arming it again always
/// replaces the previous one. Time accumulated before a `reschedule` is
/// dropped, the same as clearing an interval and setting a new one.
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
    accumulated: Duration,
    armed: bool,
    generation: u64,
    max_catch_up: u32,
}

impl Scheduler {
    pub fn new(max_catch_up: u32) -> Self {
        Scheduler {
            interval: Duration::ZERO,
            accumulated: Duration::ZERO,
            armed: false,
            generation: 0,
            max_catch_up: max_catch_up.max(1),
        }
    }

    pub fn start(&mut self, interval: Duration) {
        self.reschedule(interval);
    }

    /// Cancels the armed timer and arms a new one with `interval`.
    pub fn reschedule(&mut self, interval: Duration) {
        self.interval = interval.max(Duration::from_millis(1));
        self.accumulated = Duration::ZERO;
        self.armed = true;
        self.generation += 1;
        trace!(
            interval_ms = self.interval.as_millis() as u64,
            generation = self.generation,
            "timer armed"
        );
    }

    pub fn cancel(&mut self) {
        if self.armed {
            trace!(generation = self.generation, "timer cancelled");
        }
        self.armed = false;
        self.accumulated = Duration::ZERO;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn advance(&mut self, dt: Duration) {
        if !self.armed {
            return;
        }
        let cap = self.interval * self.max_catch_up;
        self.accumulated = (self.accumulated + dt).min(cap);
    }

    /// Consumes one interval if it has fully elapsed.
    pub fn take_tick(&mut self) -> bool {
        if !self.armed || self.accumulated < self.interval {
            return false;
        }
        self.accumulated -= self.interval;
        true
    }
}
