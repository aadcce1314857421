#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Low PBKDF2 cost so debug-build tests stay fast.
const FAST_CONFIG: &str = "[auth]\niterations = 1000\n";

/// A throwaway data directory for one test
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> std::io::Result<Self> {
        let home = Self::bare()?;
        home.write_file("tasker.toml", FAST_CONFIG)?;
        Ok(home)
    }

    /// A data directory without a `tasker.toml`
    pub fn bare() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_json(&self, rel_path: &str) -> Result<Value, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(self.dir.path().join(rel_path))?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// `tasker` pointed at this data directory
    pub fn cmd(&self) -> Command {
        let mut cmd = tasker_cmd();
        cmd.arg("--data-dir").arg(self.path());
        cmd
    }

    /// Register `username` (and so log in as them)
    pub fn register(&self, username: &str, password: &str) {
        self.cmd()
            .args(["register", username, password])
            .assert()
            .success();
    }

    pub fn add_task(&self, name: &str, time: &str, priority: &str, due: &str) {
        self.cmd()
            .args(["add", name, "--time", time, "--priority", priority, "--due", due])
            .assert()
            .success();
    }
}

pub fn tasker_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tasker").expect("binary");
    cmd.env_remove("TASKER_HOME").env_remove("RUST_LOG");
    cmd
}
