//! Activity detection: which items are being staged right now.
//!
//! Candidates are the numeric subdirectories of `steamapps/downloading`.
//! Eligibility is decided per candidate from the staging directory contents
//! and, depending on `Eligibility`, the item's manifest. Walk failures on one
//! candidate make only that candidate ineligible.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::Serialize;
use walkdir::WalkDir;

use crate::config::Eligibility;
use crate::layout::SteamLayout;
use crate::manifest::Manifest;

/// One actively staged installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: String,
    pub display_name: String,
    #[serde(skip)]
    pub manifest_path: PathBuf,
    #[serde(skip)]
    pub staging_dir: PathBuf,
}

/// Label used when the manifest has no usable `name`.
pub fn fallback_name(id: &str) -> String {
    format!("AppID {id}")
}

/// Detection knobs, usually taken from `MonitorConfig`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectOptions {
    pub eligibility: Eligibility,
    /// Ignore staging directories whose mtime is older than this.
    pub recent_activity: Option<Duration>,
}

fn is_numeric(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

/// True if `dir` contains at least one regular file at any depth.
/// A walk error before a file is found counts as "no file".
pub fn has_any_file(dir: &Path) -> bool {
    for entry in WalkDir::new(dir).min_depth(1) {
        match entry {
            Ok(e) if e.file_type().is_file() => return true,
            Ok(_) => {}
            Err(err) => {
                tracing::debug!(path = %dir.display(), error = %err, "staging walk failed");
                return false;
            }
        }
    }
    false
}

/// Total size in bytes of regular files under `dir`. Unreadable entries are skipped.
pub fn dir_size(dir: &Path) -> u64 {
    WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

fn modified_recently(dir: &Path, window: Duration, now: SystemTime) -> bool {
    let mtime = fs::metadata(dir).and_then(|m| m.modified()).unwrap_or(now);
    now.duration_since(mtime).map(|age| age <= window).unwrap_or(true)
}

fn is_eligible(staging_dir: &Path, manifest: &Manifest, eligibility: Eligibility) -> bool {
    if has_any_file(staging_dir) {
        return true;
    }
    match eligibility {
        Eligibility::NonEmpty => false,
        Eligibility::NonEmptyOrManifest => manifest.has_progress_keys(),
    }
}

/// Eligible items for this poll, in directory iteration order.
pub fn detect_active(layout: &SteamLayout, opts: &DetectOptions) -> Vec<Item> {
    let downloading = layout.downloading();
    let entries = match fs::read_dir(&downloading) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(path = %downloading.display(), error = %err, "no staging directory");
            return Vec::new();
        }
    };

    let now = SystemTime::now();
    let mut items = Vec::new();
    for entry in entries.filter_map(Result::ok) {
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        let Some(id) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !is_dir || !is_numeric(&id) {
            continue;
        }

        let staging_dir = entry.path();
        if let Some(window) = opts.recent_activity {
            if !modified_recently(&staging_dir, window, now) {
                tracing::debug!(id = %id, "staging directory not recently modified");
                continue;
            }
        }

        let manifest_path = layout.manifest_path(&id);
        let manifest = Manifest::load(&manifest_path);
        if !is_eligible(&staging_dir, &manifest, opts.eligibility) {
            tracing::debug!(id = %id, "candidate not eligible");
            continue;
        }

        let display_name = manifest
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| fallback_name(&id));
        items.push(Item {
            id,
            display_name,
            manifest_path,
            staging_dir,
        });
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (tempfile::TempDir, SteamLayout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = SteamLayout::new(dir.path());
        fs::create_dir_all(layout.downloading()).unwrap();
        (dir, layout)
    }

    fn opts(eligibility: Eligibility) -> DetectOptions {
        DetectOptions {
            eligibility,
            recent_activity: None,
        }
    }

    #[test]
    fn missing_staging_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let layout = SteamLayout::new(dir.path());
        assert!(detect_active(&layout, &opts(Eligibility::NonEmpty)).is_empty());
    }

    #[test]
    fn nested_file_makes_candidate_eligible_with_manifest_name() {
        let (_dir, layout) = setup();
        let staging = layout.staging_dir("570");
        fs::create_dir_all(staging.join("depot/sub")).unwrap();
        fs::write(staging.join("depot/sub/chunk"), b"data").unwrap();
        fs::write(layout.manifest_path("570"), "\"name\" \"Dota 2\"").unwrap();

        let items = detect_active(&layout, &opts(Eligibility::NonEmpty));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "570");
        assert_eq!(items[0].display_name, "Dota 2");
        assert_eq!(items[0].staging_dir, staging);
    }

    #[test]
    fn missing_name_falls_back_to_app_id_label() {
        let (_dir, layout) = setup();
        let staging = layout.staging_dir("440");
        fs::create_dir_all(&staging).unwrap();
        fs::write(staging.join("f"), b"x").unwrap();

        let items = detect_active(&layout, &opts(Eligibility::NonEmpty));
        assert_eq!(items[0].display_name, "AppID 440");
    }

    #[test]
    fn non_numeric_and_plain_files_are_ignored() {
        let (_dir, layout) = setup();
        let temp = layout.downloading().join("temp");
        fs::create_dir_all(&temp).unwrap();
        fs::write(temp.join("f"), b"x").unwrap();
        fs::write(layout.downloading().join("123"), b"not a dir").unwrap();

        assert!(detect_active(&layout, &opts(Eligibility::NonEmpty)).is_empty());
    }

    #[test]
    fn empty_dir_without_progress_keys_is_excluded_in_non_empty_mode() {
        let (_dir, layout) = setup();
        fs::create_dir_all(layout.staging_dir("730")).unwrap();
        fs::write(layout.manifest_path("730"), "\"name\" \"CS\"").unwrap();

        assert!(detect_active(&layout, &opts(Eligibility::NonEmpty)).is_empty());
        assert!(detect_active(&layout, &opts(Eligibility::NonEmptyOrManifest)).is_empty());
    }

    #[test]
    fn empty_dir_with_progress_keys_depends_on_mode() {
        let (_dir, layout) = setup();
        fs::create_dir_all(layout.staging_dir("730")).unwrap();
        fs::write(
            layout.manifest_path("730"),
            "\"name\" \"CS\"\n\"BytesToDownload\" \"100\"",
        )
        .unwrap();

        assert!(detect_active(&layout, &opts(Eligibility::NonEmpty)).is_empty());
        let items = detect_active(&layout, &opts(Eligibility::NonEmptyOrManifest));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].display_name, "CS");
    }

    #[test]
    fn recent_activity_window_filters_nothing_when_fresh() {
        let (_dir, layout) = setup();
        let staging = layout.staging_dir("10");
        fs::create_dir_all(&staging).unwrap();
        fs::write(staging.join("f"), b"x").unwrap();

        let o = DetectOptions {
            eligibility: Eligibility::NonEmpty,
            recent_activity: Some(Duration::from_secs(3600)),
        };
        assert_eq!(detect_active(&layout, &o).len(), 1);
    }

    #[test]
    fn recent_activity_window_drops_stale_directory() {
        let (_dir, layout) = setup();
        let stale = layout.staging_dir("20");
        let fresh = layout.staging_dir("21");
        for dir in [&stale, &fresh] {
            fs::create_dir_all(dir).unwrap();
            fs::write(dir.join("f"), b"x").unwrap();
        }
        let two_hours_ago = SystemTime::now() - Duration::from_secs(2 * 3600);
        fs::File::open(&stale)
            .unwrap()
            .set_modified(two_hours_ago)
            .unwrap();

        let o = DetectOptions {
            eligibility: Eligibility::NonEmpty,
            recent_activity: Some(Duration::from_secs(3600)),
        };
        let items = detect_active(&layout, &o);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "21");

        // Without the window the old directory is still a candidate.
        assert_eq!(detect_active(&layout, &opts(Eligibility::NonEmpty)).len(), 2);
    }

    #[test]
    fn dir_size_sums_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/one"), vec![0u8; 10]).unwrap();
        fs::write(dir.path().join("a/b/two"), vec![0u8; 32]).unwrap();
        assert_eq!(dir_size(dir.path()), 42);
        assert_eq!(dir_size(&dir.path().join("missing")), 0);
    }
}
