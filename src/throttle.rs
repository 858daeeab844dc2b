use std::time::{Duration, Instant};

/// Rate limit for one panel's redraws.
///
/// A zero cadence lets every attempt through.
#[derive(Debug, Clone, Copy)]
pub struct PanelThrottle {
    cadence: Duration,
    last_rendered: Option<Instant>,
}

impl PanelThrottle {
    pub fn new(cadence: Duration) -> Self {
        PanelThrottle {
            cadence,
            last_rendered: None,
        }
    }

    pub fn every_snapshot() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    pub fn last_rendered(&self) -> Option<Instant> {
        self.last_rendered
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_rendered {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.cadence,
        }
    }

    /// Claims a redraw slot at `now` if one is due.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.last_rendered = Some(now);
        true
    }
}
