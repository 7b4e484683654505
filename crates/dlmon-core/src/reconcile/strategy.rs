//! Named measurement strategies, tried in priority order by the reconciler.

use std::time::Duration;

use serde::Serialize;

use crate::detect::{dir_size, Item};
use crate::manifest::{
    Manifest, BYTES_DOWNLOADED, BYTES_STAGED, BYTES_TO_DOWNLOAD, BYTES_TO_STAGE,
};

use super::state::{counter_delta, rate, PriorState};

/// Which strategy produced an accepted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Manifest,
    Folder,
    Logs,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Manifest => "manifest",
            Source::Folder => "folder",
            Source::Logs => "logs",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cumulative counters as last observed, whichever strategy supplied them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub downloaded: Option<u64>,
    pub to_download: Option<u64>,
    pub staged: Option<u64>,
    pub to_stage: Option<u64>,
    pub folder_bytes: Option<u64>,
}

impl Progress {
    /// `downloaded / to_download * 100` when the total is known and non-zero.
    /// Not capped at 100: the total can be revised downwards mid-transfer.
    pub fn percent(&self) -> Option<f64> {
        let done = self.downloaded?;
        let total = self.to_download.filter(|t| *t > 0)?;
        Some(done as f64 / total as f64 * 100.0)
    }
}

/// One strategy's measurement of an item for this poll.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub source: Source,
    pub rate: f64,
    /// Staging rate; only the manifest strategy can see staging.
    pub staged_rate: Option<f64>,
    pub progress: Progress,
}

/// Everything known about an item this poll, besides its prior state.
#[derive(Debug, Clone, Copy)]
pub struct Evidence<'a> {
    pub item: &'a Item,
    pub manifest: &'a Manifest,
    /// Log-derived rate, already zeroed or withheld when logs are stale.
    pub log_rate: Option<f64>,
}

/// A named way of measuring an item. Strategies that measure cumulative
/// counters record what they saw into `prior`.
pub trait RateStrategy {
    fn source(&self) -> Source;

    fn sample(
        &self,
        ev: &Evidence<'_>,
        prior: &mut PriorState,
        elapsed: Duration,
    ) -> Option<Sample>;
}

/// `BytesDownloaded` (and staging counters when present) from the manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestCounters;

impl RateStrategy for ManifestCounters {
    fn source(&self) -> Source {
        Source::Manifest
    }

    fn sample(
        &self,
        ev: &Evidence<'_>,
        prior: &mut PriorState,
        elapsed: Duration,
    ) -> Option<Sample> {
        let downloaded = ev.manifest.get_u64(BYTES_DOWNLOADED)?;
        let staged = ev.manifest.get_u64(BYTES_STAGED);

        let delta = counter_delta(prior.downloaded, downloaded);
        let staged_rate = staged.map(|s| rate(counter_delta(prior.staged, s), elapsed));

        prior.downloaded = Some(downloaded);
        prior.staged = staged;
        prior.folder_bytes = None;

        Some(Sample {
            source: self.source(),
            rate: rate(delta, elapsed),
            staged_rate,
            progress: Progress {
                downloaded: Some(downloaded),
                to_download: ev.manifest.get_u64(BYTES_TO_DOWNLOAD),
                staged,
                to_stage: ev.manifest.get_u64(BYTES_TO_STAGE),
                folder_bytes: None,
            },
        })
    }
}

/// Recursive size of the staging directory. Always produces a sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderSize;

impl RateStrategy for FolderSize {
    fn source(&self) -> Source {
        Source::Folder
    }

    fn sample(
        &self,
        ev: &Evidence<'_>,
        prior: &mut PriorState,
        elapsed: Duration,
    ) -> Option<Sample> {
        let size = dir_size(&ev.item.staging_dir);
        let delta = counter_delta(prior.folder_bytes, size);
        prior.folder_bytes = Some(size);
        prior.downloaded = None;
        prior.staged = None;

        Some(Sample {
            source: self.source(),
            rate: rate(delta, elapsed),
            staged_rate: None,
            progress: Progress {
                folder_bytes: Some(size),
                ..Progress::default()
            },
        })
    }
}

/// Instantaneous rate parsed from the client's logs. Carries no progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRate;

impl RateStrategy for LogRate {
    fn source(&self) -> Source {
        Source::Logs
    }

    fn sample(
        &self,
        ev: &Evidence<'_>,
        _prior: &mut PriorState,
        _elapsed: Duration,
    ) -> Option<Sample> {
        ev.log_rate.map(|r| Sample {
            source: self.source(),
            rate: r,
            staged_rate: None,
            progress: Progress::default(),
        })
    }
}

/// Strategies that measure cumulative progress, highest fidelity first.
pub const PROGRESS_STRATEGIES: [&dyn RateStrategy; 2] = [&ManifestCounters, &FolderSize];

/// Strategies that may override the current rate, highest fidelity first.
pub const RATE_OVERRIDES: [&dyn RateStrategy; 1] = [&LogRate];
