//! Configuration loading and management
//!
//! Handles parsing of the optional `tasker.toml` in the data directory.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::auth::HashScheme;
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;

/// Name of the configuration file inside the data directory
pub const CONFIG_FILENAME: &str = "tasker.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// File layout and locking
    #[serde(default)]
    pub storage: StorageConfig,

    /// Password hashing
    #[serde(default)]
    pub auth: AuthConfig,

    /// Task behaviour
    #[serde(default)]
    pub tasks: TasksConfig,
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Credential mapping file, relative to the data directory
    #[serde(default = "default_users_file")]
    pub users_file: String,

    /// Session file, relative to the data directory
    #[serde(default = "default_session_file")]
    pub session_file: String,

    /// Directory holding one task file per user
    #[serde(default = "default_tasks_dir")]
    pub tasks_dir: String,

    /// How long to wait for a state file lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_users_file() -> String {
    "users.json".to_string()
}

fn default_session_file() -> String {
    "session.json".to_string()
}

fn default_tasks_dir() -> String {
    "tasks".to_string()
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            users_file: default_users_file(),
            session_file: default_session_file(),
            tasks_dir: default_tasks_dir(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Scheme used for newly registered users
    #[serde(default)]
    pub scheme: HashScheme,

    /// PBKDF2 rounds for newly registered users
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

fn default_iterations() -> u32 {
    crate::auth::DEFAULT_PBKDF2_ITERATIONS
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            scheme: HashScheme::default(),
            iterations: default_iterations(),
        }
    }
}

/// Tasks configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Treat an empty `list` result as a task-not-found error
    #[serde(default = "default_true")]
    pub empty_list_is_error: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            empty_list_is_error: true,
        }
    }
}

impl StorageConfig {
    fn validate(&self) -> crate::error::Result<()> {
        validate_relative_path(&self.users_file, "storage.users_file")?;
        validate_relative_path(&self.session_file, "storage.session_file")?;
        validate_relative_path(&self.tasks_dir, "storage.tasks_dir")?;
        if self.users_file.trim() == self.session_file.trim() {
            return Err(crate::error::Error::InvalidConfig(
                "storage.users_file and storage.session_file must differ".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_relative_path(value: &str, field: &str) -> crate::error::Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::error::Error::InvalidConfig(format!(
            "{field} cannot be empty"
        )));
    }
    let path = Path::new(trimmed);
    if path.is_absolute() || path.components().any(|c| c.as_os_str() == "..") {
        return Err(crate::error::Error::InvalidConfig(format!(
            "{field} must be a relative path inside the data directory: '{value}'"
        )));
    }
    Ok(())
}

impl AuthConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.iterations == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "auth.iterations must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load and validate configuration from a `tasker.toml` file
    ///
    /// Syntax errors, unknown values and failed validation all surface as
    /// [`Error::InvalidConfig`](crate::error::Error::InvalidConfig).
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|err| {
            crate::error::Error::InvalidConfig(format!("{}: {}", path.display(), err.message()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory
    ///
    /// A missing file means defaults. A file that exists must be valid: its
    /// storage layout decides which files every command reads and writes.
    pub fn load_from_dir(data_dir: &Path) -> crate::error::Result<Self> {
        let config_path = data_dir.join(CONFIG_FILENAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        let config = Self::load(&config_path)?;
        tracing::debug!(path = %config_path.display(), "loaded config");
        Ok(config)
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.storage.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}
