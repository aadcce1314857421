//! Session tracking.
//!
//! The session file names at most one logged-in user for the whole data
//! directory. It is read once per invocation into a [`Session`] value which
//! task operations take explicitly.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock;
use crate::storage::Storage;

/// On-disk session record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub current_user: Option<String>,
}

impl SessionRecord {
    /// The logged-in username, if any. A blank name counts as logged out.
    ///
    /// The name is returned exactly as stored; it keys both the credential
    /// record and the task file.
    pub fn user(&self) -> Option<&str> {
        self.current_user
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }
}

/// Proof that a user is logged in, resolved from the session file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
}

impl Session {
    pub(crate) fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Reads and writes the session file
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Storage,
}

impl SessionStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Load the raw record; `None` when the session file does not exist.
    pub fn load(&self) -> Result<Option<SessionRecord>> {
        let path = self.storage.session_file();
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(self.storage.read_json_or_default(&path)?))
    }

    /// Resolve the current session.
    ///
    /// A missing file and a record without a user both fail with
    /// [`Error::NotLoggedIn`].
    pub fn current(&self) -> Result<Session> {
        let record = self.load()?.ok_or(Error::NotLoggedIn)?;
        let username = record.user().ok_or(Error::NotLoggedIn)?;
        Ok(Session::new(username))
    }

    /// Make `username` the current user, replacing any previous session.
    pub fn begin(&self, username: &str) -> Result<Session> {
        let path = self.storage.session_file();
        let record = SessionRecord {
            current_user: Some(username.to_string()),
        };
        lock::with_lock(&path, self.storage.lock_timeout_ms(), || {
            self.storage.write_json(&path, &record)
        })?;
        tracing::debug!(user = username, "session started");
        Ok(Session::new(username))
    }

    /// Clear the current user.
    ///
    /// Only the existence of the session file is checked; clearing an
    /// already-empty session succeeds.
    pub fn end(&self) -> Result<()> {
        let path = self.storage.session_file();
        lock::with_lock(&path, self.storage.lock_timeout_ms(), || {
            if !path.exists() {
                return Err(Error::NotLoggedIn);
            }
            self.storage.write_json(&path, &SessionRecord::default())
        })?;
        tracing::debug!("session cleared");
        Ok(())
    }
}
