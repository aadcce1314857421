//! Shared output formatting for tasker commands.

use serde::Serialize;

use crate::error::{Error, JsonError, Result};

pub const SCHEMA_VERSION: &str = "tasker.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone, Default)]
pub struct HumanOutput {
    header: String,
    lines: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ..Self::default()
        }
    }

    /// Output made only of plain lines, without a header.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            ..Self::default()
        }
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let next_steps = human.map(|h| h.next_steps.clone()).unwrap_or_default();

        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            data: &'a T,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }

    if let Some(human) = human {
        println!("{}", format_human(human));
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    if json {
        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: JsonError,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: JsonError::from(err),
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("Error: {err}");
    if let Some(hint) = next_steps.first() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = Vec::new();
    if !output.header.is_empty() {
        lines.push(output.header.clone());
    }
    lines.extend(output.lines.iter().cloned());

    push_section(&mut lines, "Next steps", &output.next_steps);

    lines.join("\n")
}

/// Best-effort command name for error envelopes, read before clap parses.
pub fn infer_command_name_from_args() -> String {
    command_name_from(std::env::args().skip(1))
}

fn command_name_from(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--data-dir" {
            args.next();
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        return arg;
    }
    "tasker".to_string()
}

fn error_next_steps(err: &Error) -> Vec<String> {
    match err {
        Error::NotLoggedIn => vec!["tasker login <username> <password>".to_string()],
        Error::UserNotFound(_) => vec!["tasker register <username> <password>".to_string()],
        Error::TaskNotFound(_) => vec!["tasker list".to_string()],
        Error::InvalidConfig(_) => vec!["fix tasker.toml then retry".to_string()],
        Error::LockFailed(_) => vec!["retry once other tasker commands finish".to_string()],
        _ => Vec::new(),
    }
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push(format!("{title}:"));
    for item in items {
        lines.push(format!("- {item}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn command_name_skips_global_flags() {
        assert_eq!(command_name_from(args(&["--json", "list"])), "list");
        assert_eq!(
            command_name_from(args(&["--data-dir", "/tmp/x", "add", "Gym"])),
            "add"
        );
        assert_eq!(command_name_from(args(&["-q"])), "tasker");
    }
}
