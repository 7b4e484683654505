//! CLI command handlers. Each command is in its own file for clarity.

mod once;
mod root;
mod watch;

pub use once::run_once;
pub use root::run_root;
pub use watch::run_watch;

use anyhow::Result;
use dlmon_core::report::PollReport;

/// Print a poll report to stdout as text or JSON lines.
pub(super) fn print_report(report: &PollReport, json: bool) -> Result<()> {
    let lines = if json {
        report.json_lines()?
    } else {
        report.lines()
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}
