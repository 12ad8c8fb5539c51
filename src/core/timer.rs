use std::time::Duration;

/// One-shot deadline advanced by frame deltas rather than the wall clock
///
/// A host that stops delivering frames (hidden tab, paused loop) also pauses
/// the deadline.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    limit: Duration,
    spent: Duration,
    armed: bool,
}

impl Countdown {
    /// Disarmed until [`Countdown::start`] is called
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            spent: Duration::ZERO,
            armed: false,
        }
    }

    /// Arms the deadline from zero, also when it was already running
    pub fn start(&mut self) {
        self.spent = Duration::ZERO;
        self.armed = true;
    }

    pub fn stop(&mut self) {
        self.armed = false;
    }

    pub fn is_active(&self) -> bool {
        self.armed
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.spent)
    }

    /// Returns true on the tick that crosses the limit, and only then
    pub fn tick(&mut self, delta: Duration) -> bool {
        if !self.armed {
            return false;
        }
        self.spent = self.spent.saturating_add(delta);
        if self.spent < self.limit {
            return false;
        }
        self.armed = false;
        true
    }
}
