//! Cross-poll memory: the last counters seen for each item id.

use std::collections::HashMap;
use std::time::Duration;

/// What was observed for one id on the last poll that measured it.
///
/// Only the strategy that ran last keeps a baseline; switching strategies
/// clears the other one, so the first poll after a switch has zero delta.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorState {
    pub downloaded: Option<u64>,
    pub staged: Option<u64>,
    pub folder_bytes: Option<u64>,
}

/// Prior state keyed by item id, owned by the poll loop for the process lifetime.
///
/// Entries are never evicted: an id that drops out of the candidate set keeps
/// its history for when it reappears.
#[derive(Debug, Default)]
pub struct StateStore {
    items: HashMap<String, PriorState>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&PriorState> {
        self.items.get(id)
    }

    pub fn entry(&mut self, id: &str) -> &mut PriorState {
        self.items.entry(id.to_string()).or_default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Growth of a counter since `prior`. No prior means no growth; a counter
/// that went backwards (reset, manifest rewrite) also counts as no growth.
pub fn counter_delta(prior: Option<u64>, current: u64) -> u64 {
    current.saturating_sub(prior.unwrap_or(current))
}

/// Bytes per second for `delta` over `elapsed`; zero when nothing elapsed.
pub fn rate(delta: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    delta as f64 / secs
}
