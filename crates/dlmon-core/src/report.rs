//! Poll results and their text/JSON renderings.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::reconcile::{Progress, Source, Status};

const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = MIB * 1024.0;

/// Outcome for one item in one poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemReport {
    pub id: String,
    pub display_name: String,
    pub status: Status,
    pub rate_bps: f64,
    pub source: Source,
    pub progress: Progress,
}

impl ItemReport {
    pub fn percent(&self) -> Option<f64> {
        self.progress.percent()
    }
}

/// Everything one poll produced.
#[derive(Debug, Clone, Serialize)]
pub struct PollReport {
    pub timestamp: DateTime<Local>,
    pub items: Vec<ItemReport>,
    /// Log-derived rate (0 when stale), shown when no item is eligible.
    pub log_rate_bps: f64,
}

impl PollReport {
    /// Text lines: one per item, or a single summary line.
    pub fn lines(&self) -> Vec<String> {
        let ts = self.timestamp.format("%H:%M:%S");
        if self.items.is_empty() {
            let status = if self.log_rate_bps > 0.0 {
                Status::Downloading
            } else {
                Status::Idle
            };
            return vec![format!(
                "[{ts}] no active downloads | {status} | speed={}",
                format_rate(self.log_rate_bps)
            )];
        }
        self.items
            .iter()
            .map(|item| format!("[{ts}] {}", item_line(item)))
            .collect()
    }

    /// JSON lines: one object per item, or a summary object.
    pub fn json_lines(&self) -> serde_json::Result<Vec<String>> {
        if self.items.is_empty() {
            return Ok(vec![serde_json::to_string(self)?]);
        }
        #[derive(Serialize)]
        struct Line<'a> {
            timestamp: &'a DateTime<Local>,
            #[serde(flatten)]
            item: &'a ItemReport,
            percent: Option<f64>,
        }
        self.items
            .iter()
            .map(|item| {
                serde_json::to_string(&Line {
                    timestamp: &self.timestamp,
                    item,
                    percent: item.percent(),
                })
            })
            .collect()
    }
}

fn item_line(item: &ItemReport) -> String {
    let mut line = format!(
        "{} ({}) | {} | speed={}",
        item.display_name,
        item.id,
        item.status,
        format_rate(item.rate_bps)
    );
    let p = &item.progress;
    match (p.downloaded, p.to_download, p.folder_bytes) {
        (Some(done), Some(total), _) if total > 0 => {
            line.push_str(&format!(
                " | {} / {}",
                format_bytes(done),
                format_bytes(total)
            ));
            if let Some(pct) = item.percent() {
                line.push_str(&format!(" ({pct:.1}%)"));
            }
        }
        (Some(done), _, _) => line.push_str(&format!(" | {}", format_bytes(done))),
        (None, _, Some(size)) => line.push_str(&format!(" | staged {}", format_bytes(size))),
        _ => {}
    }
    line.push_str(&format!(" | source={}", item.source));
    line
}

/// KB/s below 1 MB/s (no decimals), MB/s with two decimals above.
pub fn format_rate(bps: f64) -> String {
    let mbps = bps / MIB;
    if mbps >= 1.0 {
        return format!("{mbps:.2} MB/s");
    }
    format!("{:.0} KB/s", bps / 1024.0)
}

pub fn format_bytes(bytes: u64) -> String {
    let b = bytes as f64;
    if b >= GIB {
        format!("{:.2} GB", b / GIB)
    } else if b >= MIB {
        format!("{:.1} MB", b / MIB)
    } else {
        format!("{:.0} KB", b / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(items: Vec<ItemReport>, log_rate_bps: f64) -> PollReport {
        PollReport {
            timestamp: Local::now(),
            items,
            log_rate_bps,
        }
    }

    fn downloading() -> ItemReport {
        ItemReport {
            id: "570".to_string(),
            display_name: "Dota 2".to_string(),
            status: Status::Downloading,
            rate_bps: 1_572_864.0,
            source: Source::Manifest,
            progress: Progress {
                downloaded: Some(250_000),
                to_download: Some(1_000_000),
                ..Progress::default()
            },
        }
    }

    #[test]
    fn rate_scaling() {
        assert_eq!(format_rate(0.0), "0 KB/s");
        assert_eq!(format_rate(512_000.0), "500 KB/s");
        assert_eq!(format_rate(1_572_864.0), "1.50 MB/s");
    }

    #[test]
    fn byte_scaling() {
        assert_eq!(format_bytes(2048), "2 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn item_line_carries_all_fields() {
        let lines = report(vec![downloading()], 0.0).lines();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert!(line.contains("Dota 2 (570)"));
        assert!(line.contains("| downloading |"));
        assert!(line.contains("speed=1.50 MB/s"));
        assert!(line.contains("(25.0%)"));
        assert!(line.ends_with("source=manifest"));
    }

    #[test]
    fn empty_poll_is_one_summary_line() {
        let lines = report(Vec::new(), 0.0).lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("no active downloads | idle/paused | speed=0 KB/s"));
    }

    #[test]
    fn json_line_per_item_has_percent() {
        let json = report(vec![downloading()], 0.0).json_lines().unwrap();
        assert_eq!(json.len(), 1);
        let v: serde_json::Value = serde_json::from_str(&json[0]).unwrap();
        assert_eq!(v["id"], "570");
        assert_eq!(v["status"], "downloading");
        assert_eq!(v["source"], "manifest");
        assert_eq!(v["percent"], 25.0);
        assert_eq!(v["progress"]["downloaded"], 250_000);
    }
}
