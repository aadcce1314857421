//! Command-line interface for tasker
//!
//! This module defines the CLI structure using clap derive macros.
//! Account commands live in `account`, task commands in `task`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::auth::Accounts;
use crate::config::Config;
use crate::error::Result;
use crate::storage::Storage;
use crate::task::{TaskStatus, TaskStore};

mod account;
mod task;

/// tasker - personal task tracker
///
/// Register a local account, log in, and keep a private list of tasks
/// with a time, a priority from 1 to 3, and a due date.
#[derive(Parser, Debug)]
#[command(name = "tasker")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding users, session and task files (defaults to current directory)
    #[arg(long, global = true, env = "TASKER_HOME")]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account and log in as it
    Register {
        username: String,
        password: String,
    },

    /// Log in as an existing user
    Login {
        username: String,
        password: String,
    },

    /// Log out the current user
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Add a task for the logged-in user
    Add {
        /// Task name
        name: String,

        /// Time of day (free-form, e.g. "6AM")
        #[arg(long)]
        time: String,

        /// Priority: 1, 2 or 3
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        priority: u8,

        /// Due date (free-form, e.g. "2026-02-20")
        #[arg(long)]
        due: String,
    },

    /// List tasks, optionally filtered
    List {
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,

        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        priority: Option<u8>,

        #[arg(long)]
        due: Option<String>,
    },

    /// Delete a task by its number
    Delete {
        /// Task number as shown by `list` (1-based)
        #[arg(value_name = "INDEX")]
        index: usize,
    },

    /// Change fields of a task
    Update {
        /// Task number as shown by `list` (1-based)
        #[arg(value_name = "INDEX")]
        index: usize,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        time: Option<String>,

        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        priority: Option<u8>,

        #[arg(long)]
        due: Option<String>,

        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
    },
}

/// Stores for one invocation, built from the data directory and its config
pub(crate) struct Context {
    pub accounts: Accounts,
    pub tasks: TaskStore,
}

pub(crate) fn load_context(data_dir: Option<PathBuf>) -> Result<Context> {
    let data_dir = match data_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let config = Config::load_from_dir(&data_dir)?;
    tracing::debug!(data_dir = %data_dir.display(), "loaded context");

    let storage = Storage::new(data_dir, config.storage.clone());
    Ok(Context {
        accounts: Accounts::new(storage.clone(), config.auth.clone()),
        tasks: TaskStore::new(storage, config.tasks.clone()),
    })
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Register { username, password } => {
                account::run_register(account::CredentialsOptions {
                    username,
                    password,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                })
            }
            Commands::Login { username, password } => {
                account::run_login(account::CredentialsOptions {
                    username,
                    password,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                })
            }
            Commands::Logout => account::run_logout(account::SessionOptions {
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Whoami => account::run_whoami(account::SessionOptions {
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Add { name, time, priority, due } => task::run_add(task::AddOptions {
                name,
                time,
                priority,
                due,
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::List { status, priority, due } => task::run_list(task::ListOptions {
                status,
                priority,
                due,
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Delete { index } => task::run_delete(task::DeleteOptions {
                index,
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Update { index, name, time, priority, due, status } => {
                task::run_update(task::UpdateOptions {
                    index,
                    name,
                    time,
                    priority,
                    due,
                    status,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                })
            }
        }
    }
}
