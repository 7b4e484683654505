//! Log-derived rate with a staleness cutoff.

use std::time::{Duration, Instant};

use crate::speed;

/// Remembers the last rate seen in the logs until they go quiet.
#[derive(Debug, Clone)]
pub struct LogRateTracker {
    cached: Option<f64>,
    stale_after: Duration,
}

impl LogRateTracker {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            cached: None,
            stale_after,
        }
    }

    /// Rate to display when no item is active: the cached log rate, or 0.
    pub fn current(&self) -> f64 {
        self.cached.unwrap_or(0.0)
    }

    /// Fold this poll's new log text into the cached rate and return the rate
    /// the logs vouch for right now.
    ///
    /// `last_append` is the newest non-empty read across all tailed logs. If it
    /// is missing or older than the staleness window, the cached rate is
    /// dropped (reads as 0) and the logs vouch for nothing (`None`).
    pub fn update(
        &mut self,
        new_text: &str,
        last_append: Option<Instant>,
        now: Instant,
    ) -> Option<f64> {
        if !new_text.trim().is_empty() {
            if let Some(r) = speed::last_rate(new_text) {
                self.cached = Some(r);
            }
        }
        if self.is_stale(last_append, now) {
            if self.cached.is_some_and(|r| r > 0.0) {
                tracing::debug!("logs silent past staleness window; rate forced to 0");
            }
            self.cached = None;
            return None;
        }
        self.cached
    }

    pub fn is_stale(&self, last_append: Option<Instant>, now: Instant) -> bool {
        match last_append {
            Some(at) => now.saturating_duration_since(at) > self.stale_after,
            None => true,
        }
    }
}
