//! tasker - Personal Task Tracker Library
//!
//! This library provides the core functionality for the tasker CLI: local
//! accounts, a single global login session, and per-user task lists stored
//! as JSON files in a data directory.
//!
//! # Module Organization
//!
//! - `auth`: Credential records, password hashing, register/login/logout
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `tasker.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes
//! - `output`: Human and JSON output envelopes
//! - `session`: Session file and the explicit `Session` context
//! - `storage`: Data directory layout and whole-file JSON I/O
//! - `task`: Task model and the per-user `TaskStore`

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod session;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
