//! Storage layer for tasker
//!
//! All state lives in one data directory:
//!
//! ```text
//! <data-dir>/
//!   tasker.toml          # Optional configuration
//!   users.json           # Credential mapping: username -> credential record
//!   users.json.lock      # Advisory lock guarding users.json
//!   session.json         # {"current_user": "<name>" | null}
//!   session.json.lock
//!   tasks/
//!     <username>.json    # Ordered task list for one user
//!     <username>.json.lock
//! ```
//!
//! Files are always read and written whole. Writes are atomic (temp file +
//! rename) and read-modify-write cycles hold the file's lock.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::config::StorageConfig;
use crate::error::Result;
use crate::lock;

/// Storage manager for tasker state
#[derive(Debug, Clone)]
pub struct Storage {
    /// Root directory all relative paths resolve against
    data_dir: PathBuf,
    layout: StorageConfig,
}

impl Storage {
    /// Create a storage manager rooted at `data_dir` with the given layout
    pub fn new(data_dir: PathBuf, layout: StorageConfig) -> Self {
        Self { data_dir, layout }
    }

    /// Create a storage manager using the default file names
    pub fn with_defaults(data_dir: PathBuf) -> Self {
        Self::new(data_dir, StorageConfig::default())
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    /// Path to the credential mapping
    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join(self.layout.users_file.trim())
    }

    /// Path to the session record
    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join(self.layout.session_file.trim())
    }

    /// Path to the per-user task directory
    pub fn tasks_dir(&self) -> PathBuf {
        self.data_dir.join(self.layout.tasks_dir.trim())
    }

    /// Path to the task list owned by `username`
    pub fn task_file(&self, username: &str) -> PathBuf {
        self.tasks_dir().join(format!("{username}.json"))
    }

    pub fn lock_timeout_ms(&self) -> u64 {
        self.layout.lock_timeout_ms
    }

    // =========================================================================
    // File I/O helpers
    // =========================================================================

    /// Read JSON data from a file
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        let data: T = serde_json::from_str(&content)?;
        Ok(data)
    }

    /// Read JSON data, treating a missing or blank file as `T::default()`
    pub fn read_json_or_default<T: DeserializeOwned + Default>(&self, path: &Path) -> Result<T> {
        if !path.exists() {
            return Ok(T::default());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Write JSON data atomically (pretty-printed, trailing newline)
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let mut json = serde_json::to_string_pretty(data)?;
        json.push('\n');
        lock::write_atomic(path, json.as_bytes())
    }

    /// Locked read-modify-write of a whole JSON file
    ///
    /// Loads the file (or `T::default()` if absent), hands it to `f`, and
    /// rewrites it only if `f` succeeds. The file's lock is held throughout.
    pub fn update_json<T, R, F>(&self, path: &Path, f: F) -> Result<R>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T) -> Result<R>,
    {
        lock::with_lock(path, self.lock_timeout_ms(), || {
            let mut data: T = self.read_json_or_default(path)?;
            let result = f(&mut data)?;
            self.write_json(path, &data)?;
            Ok(result)
        })
    }
}
