//! Throughput reconciliation: one status per item per poll.
//!
//! Progress comes from the first progress strategy that can measure the item
//! (manifest counters, else staging folder size). The current rate comes from
//! the logs when they vouch for one, else from that progress delta. Status is
//! then classified in priority order:
//!
//! 1. `Downloading` when the effective rate is positive;
//! 2. `Staging` when the manifest's staged counter grew;
//! 3. `Paused` when the optional log keyword scan finds a pause for this id;
//! 4. `Idle` otherwise. Quiet and paused are indistinguishable from here.

mod logs;
mod pause;
mod state;
mod strategy;

use std::time::Duration;

use serde::Serialize;

use crate::detect::Item;
use crate::manifest::Manifest;
use crate::report::ItemReport;

pub use logs::LogRateTracker;
pub use pause::recently_paused;
pub use state::{counter_delta, rate, PriorState, StateStore};
pub use strategy::{
    Evidence, FolderSize, LogRate, ManifestCounters, Progress, RateStrategy, Sample, Source,
    PROGRESS_STRATEGIES, RATE_OVERRIDES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Downloading,
    Staging,
    Paused,
    Idle,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Downloading => "downloading",
            Status::Staging => "staging/installing",
            Status::Paused => "paused",
            Status::Idle => "idle/paused",
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Status::Downloading | Status::Staging)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-poll inputs shared by every item.
#[derive(Debug, Clone, Copy)]
pub struct PollContext<'a> {
    /// Elapsed time that counter deltas are divided by.
    pub elapsed: Duration,
    /// Rate the logs vouch for this poll (`None` when stale or absent).
    pub log_rate: Option<f64>,
    /// Trailing content-log lines for the pause scan; `None` disables it.
    pub recent_log: Option<&'a [String]>,
}

/// Measure and classify one item, recording what was observed in `store`.
pub fn reconcile(
    item: &Item,
    manifest: &Manifest,
    ctx: &PollContext<'_>,
    store: &mut StateStore,
) -> ItemReport {
    let ev = Evidence {
        item,
        manifest,
        log_rate: ctx.log_rate,
    };
    let prior = store.entry(&item.id);

    let measured = PROGRESS_STRATEGIES
        .iter()
        .find_map(|s| s.sample(&ev, prior, ctx.elapsed));
    let overriding = RATE_OVERRIDES
        .iter()
        .find_map(|s| s.sample(&ev, prior, ctx.elapsed));

    let (rate, source) = match (&overriding, &measured) {
        (Some(o), _) => (o.rate, o.source),
        (None, Some(m)) => (m.rate, m.source),
        (None, None) => (0.0, Source::Folder),
    };
    let staged_rate = measured.as_ref().and_then(|m| m.staged_rate).unwrap_or(0.0);
    let progress = measured.map(|m| m.progress).unwrap_or_default();

    let status = if rate > 0.0 {
        Status::Downloading
    } else if staged_rate > 0.0 {
        Status::Staging
    } else if ctx
        .recent_log
        .is_some_and(|lines| recently_paused(lines, &item.id))
    {
        Status::Paused
    } else {
        Status::Idle
    };

    tracing::debug!(
        id = %item.id,
        status = %status,
        rate,
        source = %source,
        "item reconciled"
    );

    ItemReport {
        id: item.id.clone(),
        display_name: item.display_name.clone(),
        status,
        rate_bps: rate,
        source,
        progress,
    }
}
