//! Key-value manifest reader for `appmanifest_<id>.acf` files.
//!
//! The client rewrites these files while we read them, so a manifest is
//! re-parsed on every poll and never cached. Only quoted `"key" "value"` pairs
//! are extracted; section nesting is ignored.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

pub const BYTES_DOWNLOADED: &str = "BytesDownloaded";
pub const BYTES_TO_DOWNLOAD: &str = "BytesToDownload";
pub const BYTES_STAGED: &str = "BytesStaged";
pub const BYTES_TO_STAGE: &str = "BytesToStage";
pub const NAME: &str = "name";

/// Keys whose presence marks a manifest as describing an in-progress transfer.
pub const PROGRESS_KEYS: [&str; 4] = [
    BYTES_DOWNLOADED,
    BYTES_TO_DOWNLOAD,
    BYTES_STAGED,
    BYTES_TO_STAGE,
];

fn pair_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([^"]*)"\s*"([^"]*)""#).expect("valid manifest pattern"))
}

/// Flat snapshot of one manifest's key-value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    values: HashMap<String, String>,
}

impl Manifest {
    /// Read and parse `path`. Absent or unreadable files yield an empty manifest.
    pub fn load(path: &Path) -> Self {
        match fs::read(path) {
            Ok(bytes) => Self::parse(&String::from_utf8_lossy(&bytes)),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "manifest unavailable");
                Self::default()
            }
        }
    }

    /// Extract every quoted pair in `text`. The first occurrence of a key wins.
    pub fn parse(text: &str) -> Self {
        let mut values = HashMap::new();
        for caps in pair_re().captures_iter(text) {
            let key = caps[1].trim();
            if key.is_empty() {
                continue;
            }
            values
                .entry(key.to_string())
                .or_insert_with(|| caps[2].trim().to_string());
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Integer value of `key`, only when the raw string is purely numeric.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        let raw = self.get(key)?;
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        raw.parse().ok()
    }

    /// Human label from the `name` field, if present and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.get(NAME).filter(|n| !n.is_empty())
    }

    pub fn has_progress_keys(&self) -> bool {
        PROGRESS_KEYS.iter().any(|k| self.values.contains_key(*k))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
"AppState"
{
	"appid"		"570"
	"name"		"  Dota 2 "
	"StateFlags"		"1026"
	"BytesToDownload"		"1000000"
	"BytesDownloaded"		"250000"
	"BytesToStage"		"900000"
	"BytesStaged"		"-1"
	"InstalledDepots"
	{
		"571"
		{
			"manifest"		"7280959080077824592"
			"name"		"depot"
		}
	}
}
"#;

    #[test]
    fn parses_nested_acf_into_flat_map() {
        let m = Manifest::parse(SAMPLE);
        assert_eq!(m.get("appid"), Some("570"));
        assert_eq!(m.name(), Some("Dota 2"));
        assert_eq!(m.get_u64(BYTES_DOWNLOADED), Some(250_000));
        assert_eq!(m.get_u64(BYTES_TO_DOWNLOAD), Some(1_000_000));
        assert!(m.has_progress_keys());
    }

    #[test]
    fn non_numeric_values_are_absent_not_errors() {
        let m = Manifest::parse(SAMPLE);
        assert_eq!(m.get(BYTES_STAGED), Some("-1"));
        assert_eq!(m.get_u64(BYTES_STAGED), None);
        assert_eq!(m.get_u64("name"), None);
        assert_eq!(m.get_u64("missing"), None);
    }

    #[test]
    fn garbage_yields_empty_manifest() {
        let m = Manifest::parse("no quotes here { } \"dangling");
        assert!(m.is_empty());
        assert!(!m.has_progress_keys());
    }

    #[test]
    fn missing_file_yields_empty_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let m = Manifest::load(&dir.path().join("appmanifest_1.acf"));
        assert!(m.is_empty());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appmanifest_2.acf");
        let mut bytes = b"\"name\" \"Caf".to_vec();
        bytes.push(0xFF);
        bytes.extend_from_slice(b"\"\n\"BytesDownloaded\" \"42\"");
        std::fs::write(&path, bytes).unwrap();
        let m = Manifest::load(&path);
        assert_eq!(m.get_u64(BYTES_DOWNLOADED), Some(42));
        assert!(m.name().unwrap().starts_with("Caf"));
    }
}
