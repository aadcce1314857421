//! File locking and atomic writes for tasker
//!
//! Every read-modify-write of a state file runs under an exclusive advisory
//! lock on a sibling `<file>.lock`, and every write lands through a temp file
//! in the same directory followed by a rename. Readers therefore never see a
//! half-written file, and two invocations racing on the same file serialize
//! instead of losing updates.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Default lock timeout in milliseconds
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5000;

/// Default retry interval when waiting for a lock
const LOCK_RETRY_INTERVAL_MS: u64 = 50;

fn is_lock_contended(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }

    // On Windows, fs2/libc can surface lock/sharing violations as "Other".
    #[cfg(windows)]
    {
        matches!(err.raw_os_error(), Some(32) | Some(33))
    }
    #[cfg(not(windows))]
    {
        false
    }
}

fn open_lock_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    Ok(OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?)
}

/// A file lock guard that releases the lock when dropped
pub struct FileLock {
    file: File,
}

impl FileLock {
    /// Acquire an exclusive lock on a file with timeout
    ///
    /// The lock file is created if missing. Returns `Error::LockFailed` if the
    /// lock cannot be acquired within the timeout.
    pub fn acquire(path: impl AsRef<Path>, timeout_ms: u64) -> Result<Self> {
        let path = path.as_ref();
        let file = open_lock_file(path)?;

        let start = Instant::now();
        let timeout = Duration::from_millis(timeout_ms);
        let retry_interval = Duration::from_millis(LOCK_RETRY_INTERVAL_MS);

        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "lock acquired");
                    return Ok(FileLock { file });
                }
                Err(e) if is_lock_contended(&e) => {
                    if start.elapsed() >= timeout {
                        tracing::debug!(path = %path.display(), timeout_ms, "lock timed out");
                        return Err(Error::LockFailed(path.to_path_buf()));
                    }
                    std::thread::sleep(retry_interval);
                }
                Err(e) => {
                    return Err(Error::Io(e));
                }
            }
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Path of the lock file guarding `path` (`<path>.lock`)
pub fn lock_path_for(path: impl AsRef<Path>) -> PathBuf {
    let mut name = OsString::from(path.as_ref().as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

/// Atomically write data to a file
///
/// Writes to a temp file in the target's directory, syncs it, then renames
/// it over the target. Does NOT take a lock; see [`with_lock`].
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| Error::Io(err.error))?;

    Ok(())
}

/// Run `f` while holding the lock for `path`
///
/// The lock is released when `f` returns, whether it succeeded or not.
pub fn with_lock<T, F>(path: impl AsRef<Path>, timeout_ms: u64, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let _lock = FileLock::acquire(lock_path_for(path), timeout_ms)?;
    f()
}
