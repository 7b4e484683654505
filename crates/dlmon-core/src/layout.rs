//! Well-known paths under a Steam installation root.

use std::path::{Path, PathBuf};

/// Logs tailed for rate expressions, relative to `<root>/logs`.
pub const DOWNLOAD_LOG: &str = "download_log.txt";
pub const CONTENT_LOG: &str = "content_log.txt";

/// Path derivations for one installation root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SteamLayout {
    root: PathBuf,
}

impl SteamLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Metadata directory holding `appmanifest_<id>.acf` files.
    pub fn steamapps(&self) -> PathBuf {
        self.root.join("steamapps")
    }

    /// Staging directory whose numeric subdirectories are in-progress items.
    pub fn downloading(&self) -> PathBuf {
        self.steamapps().join("downloading")
    }

    pub fn staging_dir(&self, id: &str) -> PathBuf {
        self.downloading().join(id)
    }

    pub fn manifest_path(&self, id: &str) -> PathBuf {
        self.steamapps().join(format!("appmanifest_{id}.acf"))
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn download_log(&self) -> PathBuf {
        self.logs_dir().join(DOWNLOAD_LOG)
    }

    pub fn content_log(&self) -> PathBuf {
        self.logs_dir().join(CONTENT_LOG)
    }
}
