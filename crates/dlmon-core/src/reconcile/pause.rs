//! Optional refinement of "idle/paused" into "paused" from content log lines.

const PAUSE_KEYWORDS: [&str; 2] = ["pause", "suspend"];

/// True if `line` contains `id` as a standalone number.
fn mentions_id(line: &str, id: &str) -> bool {
    line.split(|c: char| !c.is_ascii_digit()).any(|tok| tok == id)
}

fn mentions_pause(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    PAUSE_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Whether any of `lines` names `id` together with a pause/suspend keyword.
pub fn recently_paused(lines: &[String], id: &str) -> bool {
    lines.iter().any(|l| mentions_id(l, id) && mentions_pause(l))
}
