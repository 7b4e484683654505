//! Poll loop: owns all cross-poll state and runs one reconciliation pass per
//! interval.
//!
//! The `Monitor` holds the per-item prior state and the log cursors for the
//! process lifetime; nothing is persisted, so a fresh process re-baselines on
//! its first poll.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Local;

use crate::config::MonitorConfig;
use crate::detect::{detect_active, DetectOptions};
use crate::layout::SteamLayout;
use crate::manifest::Manifest;
use crate::reconcile::{reconcile, LogRateTracker, PollContext, StateStore};
use crate::report::PollReport;
use crate::tail::{recent_lines, LogTailer};

pub struct Monitor {
    layout: SteamLayout,
    detect: DetectOptions,
    elapsed: Duration,
    pause_scan_lines: Option<usize>,
    tailers: Vec<LogTailer>,
    log_rate: LogRateTracker,
    store: StateStore,
}

impl Monitor {
    /// Start monitoring `root`; log tailers begin at the current end of each log.
    pub fn new(root: impl Into<PathBuf>, cfg: &MonitorConfig) -> Self {
        let layout = SteamLayout::new(root);
        let tailers = vec![
            LogTailer::at_end(layout.download_log(), cfg.max_log_chunk_bytes),
            LogTailer::at_end(layout.content_log(), cfg.max_log_chunk_bytes),
        ];
        Self {
            detect: DetectOptions {
                eligibility: cfg.eligibility,
                recent_activity: cfg.recent_activity(),
            },
            elapsed: cfg.interval(),
            pause_scan_lines: cfg
                .pause_heuristic
                .enabled
                .then_some(cfg.pause_heuristic.scan_lines),
            tailers,
            log_rate: LogRateTracker::new(cfg.stale_window()),
            store: StateStore::new(),
            layout,
        }
    }

    pub fn layout(&self) -> &SteamLayout {
        &self.layout
    }

    pub fn state(&self) -> &StateStore {
        &self.store
    }

    pub fn poll(&mut self) -> PollReport {
        self.poll_at(Instant::now())
    }

    /// One poll with `now` as the reference instant for log staleness.
    pub fn poll_at(&mut self, now: Instant) -> PollReport {
        let items = detect_active(&self.layout, &self.detect);

        let mut new_text = String::new();
        for tailer in &mut self.tailers {
            new_text.push('\n');
            new_text.push_str(&tailer.read_new_at(now));
        }
        let last_append = self.tailers.iter().filter_map(|t| t.last_read_at()).max();
        let log_rate = self.log_rate.update(&new_text, last_append, now);

        let recent = match self.pause_scan_lines {
            Some(n) if !items.is_empty() => Some(recent_lines(&self.layout.content_log(), n)),
            _ => None,
        };
        let ctx = PollContext {
            elapsed: self.elapsed,
            log_rate,
            recent_log: recent.as_deref(),
        };

        let reports = items
            .iter()
            .map(|item| {
                let manifest = Manifest::load(&item.manifest_path);
                reconcile(item, &manifest, &ctx, &mut self.store)
            })
            .collect();

        PollReport {
            timestamp: Local::now(),
            items: reports,
            log_rate_bps: self.log_rate.current(),
        }
    }

    /// Poll `cycles` times, `interval` apart, handing each report to `sink`.
    /// The first poll runs immediately; there is no sleep after the last.
    pub fn run<F>(&mut self, cycles: u32, interval: Duration, mut sink: F)
    where
        F: FnMut(&PollReport),
    {
        for i in 0..cycles {
            let report = self.poll();
            let active = report.items.iter().filter(|r| r.status.is_active()).count();
            tracing::debug!(
                cycle = i + 1,
                items = report.items.len(),
                active,
                "poll complete"
            );
            sink(&report);
            if i + 1 < cycles {
                std::thread::sleep(interval);
            }
        }
    }
}
