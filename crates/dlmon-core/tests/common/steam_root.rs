//! Synthetic Steam installation for driving the monitor in tests.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use dlmon_core::layout::SteamLayout;
use tempfile::TempDir;

pub struct FakeSteam {
    pub dir: TempDir,
    pub layout: SteamLayout,
}

impl FakeSteam {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let layout = SteamLayout::new(dir.path());
        fs::create_dir_all(layout.downloading()).unwrap();
        fs::create_dir_all(layout.logs_dir()).unwrap();
        Self { dir, layout }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Create the staging directory for `id`, optionally with one file in it.
    pub fn stage(&self, id: &str, with_file: bool) {
        let staging = self.layout.staging_dir(id);
        fs::create_dir_all(&staging).unwrap();
        if with_file {
            fs::write(staging.join("chunk.bin"), b"x").unwrap();
        }
    }

    pub fn write_manifest(&self, id: &str, name: &str, downloaded: u64, to_download: u64) {
        let body = format!(
            "\"AppState\"\n{{\n\t\"appid\"\t\t\"{id}\"\n\t\"name\"\t\t\"{name}\"\n\
             \t\"BytesToDownload\"\t\t\"{to_download}\"\n\t\"BytesDownloaded\"\t\t\"{downloaded}\"\n}}\n"
        );
        fs::write(self.layout.manifest_path(id), body).unwrap();
    }

    pub fn append_content_log(&self, text: &str) {
        append(&self.layout.content_log(), text);
    }

    pub fn append_download_log(&self, text: &str) {
        append(&self.layout.download_log(), text);
    }
}

fn append(path: &Path, text: &str) {
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap();
    f.write_all(text.as_bytes()).unwrap();
}
