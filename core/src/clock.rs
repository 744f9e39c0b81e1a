use core::time::Duration;
use web_time::Instant;

/// Turns wall-clock readings into the elapsed deltas [`crate::GameController::advance`] expects.
///
/// Works the same on native targets and in the browser.
#[derive(Copy, Clone, Debug)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { last: start }
    }

    /// Time since the previous lap.
    pub fn lap(&mut self) -> Duration {
        self.lap_at(Instant::now())
    }

    /// Time between the previous lap and `now`, readings from the past count as zero.
    pub fn lap_at(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last);
        self.last = self.last.max(now);
        elapsed
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
