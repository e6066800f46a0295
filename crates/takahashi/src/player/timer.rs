use std::time::{Duration, Instant};

/// Elapsed presentation time, always derived as `now - started`.
#[derive(Debug, Clone, Copy)]
pub struct PresentationTimer {
    started: Instant,
}

impl PresentationTimer {
    pub fn start(now: Instant) -> Self {
        Self { started: now }
    }

    pub fn reset(&mut self, now: Instant) {
        self.started = now;
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    /// `m:ss`, minutes unbounded.
    pub fn display(&self, now: Instant) -> String {
        format_elapsed(self.elapsed(now))
    }
}

pub fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
