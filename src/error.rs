//! Error types for tasker
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad input, unknown task, not logged in)
//! - 3: Authentication failed (unknown user, wrong password)
//! - 4: Operation failed (I/O, corrupt state, lock timeout)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tasker CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const AUTH_FAILED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tasker operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("Task not found: #{0}")]
    TaskNotFound(usize),

    #[error("No matching tasks found")]
    NoMatchingTasks,

    #[error("You must login first")]
    NotLoggedIn,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Authentication failures (exit code 3)
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Incorrect password")]
    InvalidPassword,

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::UserAlreadyExists(_)
            | Error::TaskNotFound(_)
            | Error::NoMatchingTasks
            | Error::NotLoggedIn
            | Error::InvalidInput(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            Error::UserNotFound(_) | Error::InvalidPassword => exit_codes::AUTH_FAILED,

            Error::Io(_) | Error::Json(_) | Error::LockFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Stable, machine-readable error kind.
    ///
    /// `TaskNotFound` and `NoMatchingTasks` share a kind, as do
    /// `NotLoggedIn` and `InvalidInput`.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::UserAlreadyExists(_) => "user_already_exists",
            Error::UserNotFound(_) => "user_not_found",
            Error::InvalidPassword => "invalid_password",
            Error::TaskNotFound(_) | Error::NoMatchingTasks => "task_not_found",
            Error::NotLoggedIn | Error::InvalidInput(_) => "invalid_input",
            Error::InvalidConfig(_) => "invalid_config",
            Error::Io(_) | Error::Json(_) | Error::LockFailed(_) => "operation_failed",
        }
    }

    /// Structured fields for JSON error output, when the error carries any.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::UserAlreadyExists(username) | Error::UserNotFound(username) => {
                Some(serde_json::json!({ "username": username }))
            }
            Error::TaskNotFound(index) => Some(serde_json::json!({ "index": index })),
            Error::InvalidConfig(message) => Some(serde_json::json!({ "message": message })),
            Error::LockFailed(path) => {
                Some(serde_json::json!({ "path": path.to_string_lossy() }))
            }
            _ => None,
        }
    }
}

/// Result type alias for tasker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error body of the JSON output envelope
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
            details: err.details(),
        }
    }
}
