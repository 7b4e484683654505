//! Incremental reader for append-only log files.
//!
//! A `LogTailer` remembers how many bytes of its file have been consumed so
//! each appended byte is handed out to at most one poll. A file that shrinks
//! below the cursor is treated as rotated and re-read from the start.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Default upper bound on bytes returned by one `read_new` call.
pub const DEFAULT_MAX_CHUNK_BYTES: usize = 200_000;

/// Bytes scanned from the end of a file by `recent_lines`.
const RECENT_WINDOW_BYTES: u64 = 64 * 1024;

#[derive(Debug, Clone)]
pub struct LogTailer {
    path: PathBuf,
    offset: u64,
    last_read_at: Option<Instant>,
    max_chunk_bytes: usize,
}

impl LogTailer {
    /// Tailer positioned at the current end of `path`, so history is never "new".
    pub fn at_end(path: impl Into<PathBuf>, max_chunk_bytes: usize) -> Self {
        let mut tailer = Self {
            path: path.into(),
            offset: 0,
            last_read_at: None,
            max_chunk_bytes: max_chunk_bytes.max(1),
        };
        tailer.reset_to_end();
        tailer
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// When this tailer last returned a non-empty chunk.
    pub fn last_read_at(&self) -> Option<Instant> {
        self.last_read_at
    }

    /// Move the cursor to the current file size (0 if the file is absent).
    pub fn reset_to_end(&mut self) {
        self.offset = std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);
    }

    pub fn read_new(&mut self) -> String {
        self.read_new_at(Instant::now())
    }

    /// Text appended since the last call, at most `max_chunk_bytes` of it.
    /// Absence and I/O failures both read as "nothing new".
    pub fn read_new_at(&mut self, now: Instant) -> String {
        match self.try_read_new() {
            Ok(bytes) if !bytes.is_empty() => {
                self.offset += bytes.len() as u64;
                self.last_read_at = Some(now);
                String::from_utf8_lossy(&bytes).into_owned()
            }
            Ok(_) => String::new(),
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    tracing::debug!(path = %self.path.display(), error = %err, "log read failed");
                }
                String::new()
            }
        }
    }

    fn try_read_new(&mut self) -> io::Result<Vec<u8>> {
        let size = std::fs::metadata(&self.path)?.len();
        if size < self.offset {
            tracing::info!(
                path = %self.path.display(),
                previous_offset = self.offset,
                current_size = size,
                "log truncated or rotated; reading from start"
            );
            self.offset = 0;
        }
        if size == self.offset {
            return Ok(Vec::new());
        }

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(self.offset))?;
        let mut buf = Vec::new();
        file.take(self.max_chunk_bytes as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }
}

/// The last `n` lines of `path`, scanning a bounded window from the end.
/// Independent of any tailer cursor; absent or unreadable files yield nothing.
pub fn recent_lines(path: &Path, n: usize) -> Vec<String> {
    let read = || -> io::Result<Vec<u8>> {
        let mut file = File::open(path)?;
        let size = file.metadata()?.len();
        let start = size.saturating_sub(RECENT_WINDOW_BYTES);
        file.seek(SeekFrom::Start(start))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        Ok(buf)
    };
    let bytes = match read() {
        Ok(bytes) => bytes,
        Err(_) => return Vec::new(),
    };
    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = text.lines().collect();
    let skip = lines.len().saturating_sub(n);
    lines[skip..].iter().map(|l| l.to_string()).collect()
}
