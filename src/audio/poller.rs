use std::time::{Duration, Instant};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum PollerState {
    Stopped,
    /// Started, first deadline set on the next tick.
    Armed,
    Scheduled(Instant),
}

/// The single recurring position refresh of a player.
///
/// `start` replaces any running schedule, so there is never more than one.
#[derive(Debug, Clone)]
pub struct ProgressPoller {
    interval: Duration,
    state: PollerState,
}

impl ProgressPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: PollerState::Stopped,
        }
    }

    pub fn start(&mut self) {
        self.state = PollerState::Armed;
    }

    pub fn stop(&mut self) {
        self.state = PollerState::Stopped;
    }

    pub fn is_active(&self) -> bool {
        self.state != PollerState::Stopped
    }

    /// Returns `true` when a refresh is due at `now`.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.state {
            PollerState::Stopped => false,
            PollerState::Armed => {
                self.state = PollerState::Scheduled(now + self.interval);
                false
            }
            PollerState::Scheduled(due) if now >= due => {
                self.state = PollerState::Scheduled(now + self.interval);
                true
            }
            PollerState::Scheduled(_) => false,
        }
    }
}
