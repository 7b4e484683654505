//! `dlmon once` – a single snapshot poll.
//!
//! Rates need two observations and log tailing starts at the end of each log,
//! so rates read 0 here; progress and percentage are still reported.

use anyhow::Result;
use dlmon_core::config::MonitorConfig;
use dlmon_core::poll::Monitor;
use std::path::Path;

use super::print_report;

pub fn run_once(root: &Path, cfg: &MonitorConfig, json: bool) -> Result<()> {
    let mut monitor = Monitor::new(root, cfg);
    let report = monitor.poll();
    print_report(&report, json)
}
