//! Rate expressions in free-form log text, normalized to bytes per second.
//!
//! Byte units use binary multiples (1 KB/s = 1024 B/s); bit units use decimal
//! multiples and are divided by 8 (1 Mbps = 125 000 B/s).

use std::sync::OnceLock;

use regex::Regex;

fn rate_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(GB/s|MB/s|KB/s|B/s|Gbps|Mbps|Kbps|bps)\b")
            .expect("valid rate pattern")
    })
}

/// Convert `value` in `unit` to bytes per second. Unknown units yield `None`.
pub fn to_bytes_per_sec(value: f64, unit: &str) -> Option<f64> {
    let bytes = match unit.to_ascii_lowercase().as_str() {
        "b/s" => value,
        "kb/s" => value * 1024.0,
        "mb/s" => value * 1024.0 * 1024.0,
        "gb/s" => value * 1024.0 * 1024.0 * 1024.0,
        "bps" => value / 8.0,
        "kbps" => value * 1_000.0 / 8.0,
        "mbps" => value * 1_000_000.0 / 8.0,
        "gbps" => value * 1_000_000_000.0 / 8.0,
        _ => return None,
    };
    Some(bytes)
}

/// The last rate expression in `text`, in document order.
pub fn last_rate(text: &str) -> Option<f64> {
    rate_re()
        .captures_iter(text)
        .filter_map(|caps| {
            let value: f64 = caps[1].parse().ok()?;
            to_bytes_per_sec(value, &caps[2])
        })
        .last()
}
