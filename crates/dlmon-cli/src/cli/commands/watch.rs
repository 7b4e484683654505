//! `dlmon watch` – poll on an interval and print status lines.

use anyhow::Result;
use dlmon_core::config::MonitorConfig;
use dlmon_core::poll::Monitor;
use std::path::Path;

use super::print_report;

pub fn run_watch(root: &Path, cfg: &MonitorConfig, json: bool) -> Result<()> {
    let mut monitor = Monitor::new(root, cfg);
    if !json {
        println!("[INFO] Steam root: {}", monitor.layout().root().display());
    }
    tracing::info!(
        interval_secs = cfg.interval_secs,
        cycles = cfg.cycles,
        eligibility = ?cfg.eligibility,
        "starting watch"
    );

    let mut result = Ok(());
    monitor.run(cfg.cycles, cfg.interval(), |report| {
        if result.is_ok() {
            result = print_report(report, json);
        }
    });
    result
}
