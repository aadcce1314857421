//! tasker account command implementations
//!
//! register, login, logout and whoami.

use std::path::PathBuf;

use crate::cli::load_context;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};

/// Options for `tasker register` and `tasker login`
pub struct CredentialsOptions {
    pub username: String,
    pub password: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for commands that only touch the session
pub struct SessionOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct SessionReport {
    current_user: Option<String>,
}

pub fn run_register(options: CredentialsOptions) -> Result<()> {
    let ctx = load_context(options.data_dir)?;
    let session = ctx.accounts.register(&options.username, &options.password)?;

    let report = SessionReport {
        current_user: Some(session.username().to_string()),
    };
    let human = HumanOutput::new(format!(
        "User registered successfully! Welcome {}!",
        session.username()
    ));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "register",
        &report,
        Some(&human),
    )
}

pub fn run_login(options: CredentialsOptions) -> Result<()> {
    let ctx = load_context(options.data_dir)?;
    let session = ctx.accounts.login(&options.username, &options.password)?;

    let report = SessionReport {
        current_user: Some(session.username().to_string()),
    };
    let human = HumanOutput::new(format!("Welcome {}!", session.username()));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "login",
        &report,
        Some(&human),
    )
}

pub fn run_logout(options: SessionOptions) -> Result<()> {
    let ctx = load_context(options.data_dir)?;
    ctx.accounts.logout()?;

    let report = SessionReport { current_user: None };
    let human = HumanOutput::new("Logged out successfully!");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "logout",
        &report,
        Some(&human),
    )
}

pub fn run_whoami(options: SessionOptions) -> Result<()> {
    let ctx = load_context(options.data_dir)?;
    let session = ctx.accounts.current_user()?;

    let report = SessionReport {
        current_user: Some(session.username().to_string()),
    };
    let human = HumanOutput::new(session.username());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "whoami",
        &report,
        Some(&human),
    )
}
