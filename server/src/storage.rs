use std::{
    fs::DirBuilder,
    io,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};
use tracing::debug;

use crate::errors::CaptureError;

pub const LOG_FILE: &str = "log.txt";
pub const DATA_FILE: &str = "data.txt";

const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
const DIR_MODE: u32 = 0o755;

/// `YYYYMMDD-HHMMSS`, to the second.
pub fn timestamp(now: NaiveDateTime) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

pub fn candidate(root: &Path, timestamp: &str, seq: u32) -> PathBuf {
    root.join(format!("{timestamp}-{seq:03}"))
}

/// First sequence number at or after `from` whose directory `exists` does
/// not report as taken.
pub fn first_free<F>(root: &Path, timestamp: &str, from: u32, exists: F) -> (u32, PathBuf)
where
    F: Fn(&Path) -> bool,
{
    let mut seq = from;
    loop {
        let path = candidate(root, timestamp, seq);
        if !exists(&path) {
            return (seq, path);
        }
        seq += 1;
    }
}

/// Source of per-request output directories.
pub trait DirAllocator: Send + Sync {
    fn allocate(&self) -> Result<PathBuf, CaptureError>;
}

/// Hands out one fresh directory per captured request under a fixed root.
#[derive(Debug, Clone)]
pub struct LogDirAllocator {
    root: PathBuf,
}

impl LogDirAllocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root and any missing parents.
    pub fn ensure_root(&self) -> io::Result<()> {
        dir_builder(true).create(&self.root)
    }

    pub fn allocate_at(&self, now: NaiveDateTime) -> Result<PathBuf, CaptureError> {
        self.ensure_root().map_err(CaptureError::DirectoryCreation)?;

        let stamp = timestamp(now);
        let mut from = 1;
        loop {
            let (seq, path) = first_free(&self.root, &stamp, from, Path::exists);

            // Creation is not recursive, so losing a race to another request
            // surfaces as AlreadyExists instead of silently sharing the dir.
            match dir_builder(false).create(&path) {
                Ok(()) => return Ok(path),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!(path = %path.display(), "log directory taken, trying next");
                    from = seq + 1;
                }
                Err(e) => return Err(CaptureError::DirectoryCreation(e)),
            }
        }
    }
}

impl DirAllocator for LogDirAllocator {
    fn allocate(&self) -> Result<PathBuf, CaptureError> {
        self.allocate_at(Local::now().naive_local())
    }
}

fn dir_builder(recursive: bool) -> DirBuilder {
    let mut builder = DirBuilder::new();
    builder.recursive(recursive);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder
}
