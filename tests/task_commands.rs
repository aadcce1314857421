mod support;

use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;

use support::TestHome;

#[test]
fn add_then_list_shows_pending_task() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    home.register("user", "1234");

    home.cmd()
        .args(["add", "Gym", "--time", "6AM", "--priority", "1", "--due", "2026-02-20"])
        .assert()
        .success()
        .stdout(contains("Task added successfully!"));

    home.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout("1. Gym | Time: 6AM | Priority: 1 | Due: 2026-02-20 | Status: pending\n");

    let tasks = home.read_json("tasks/user.json")?;
    assert_eq!(tasks.as_array().map(Vec::len), Some(1));
    assert_eq!(tasks[0]["priority"], Value::from(1));
    assert_eq!(tasks[0]["status"], Value::from("pending"));

    Ok(())
}

#[test]
fn update_status_only() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    home.register("user", "1234");
    home.add_task("Gym", "6AM", "1", "2026-02-20");

    home.cmd()
        .args(["update", "1", "--status", "completed"])
        .assert()
        .success()
        .stdout(contains("Task updated successfully!"));

    home.cmd()
        .args(["list", "--status", "completed"])
        .assert()
        .success()
        .stdout(contains("1. Gym | Time: 6AM | Priority: 1 | Due: 2026-02-20 | Status: completed"));

    home.cmd()
        .args(["update", "5", "--status", "completed"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Error: Task not found: #5"));

    Ok(())
}

#[test]
fn update_without_fields_fails() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    home.register("user", "1234");
    home.add_task("Gym", "6AM", "1", "2026-02-20");

    home.cmd()
        .args(["update", "1"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Error: Provide at least one field to update"));

    Ok(())
}

#[test]
fn update_rejects_empty_name() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    home.register("user", "1234");
    home.add_task("Gym", "6AM", "1", "2026-02-20");

    home.cmd()
        .args(["update", "1", "--name", ""])
        .assert()
        .failure()
        .stderr(contains("name cannot be empty"));

    let tasks = home.read_json("tasks/user.json")?;
    assert_eq!(tasks[0]["name"], Value::from("Gym"));
    Ok(())
}

#[test]
fn delete_returns_task_and_shifts_indices() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    home.register("user", "1234");
    home.add_task("Gym", "6AM", "1", "2026-02-20");
    home.add_task("Read", "9PM", "3", "2026-02-21");

    home.cmd()
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout(contains("Deleted task: Gym | Time: 6AM"));

    home.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("1. Read"));

    home.cmd()
        .args(["delete", "10"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Error: Task not found: #10"));

    Ok(())
}

#[test]
fn list_rejects_blank_due_filter() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    home.register("user", "1234");
    home.add_task("Gym", "6AM", "1", "2026-02-20");

    home.cmd()
        .args(["list", "--due", ""])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Error: due cannot be empty"));

    Ok(())
}

#[test]
fn list_without_match_fails()-> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    home.register("user", "1234");

    home.cmd()
        .arg("list")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Error: No matching tasks found"));

    home.add_task("Gym", "6AM", "1", "2026-02-20");
    home.cmd()
        .args(["list", "--status", "completed"])
        .assert()
        .failure()
        .stderr(contains("Error: No matching tasks found"));

    Ok(())
}

#[test]
fn list_keeps_real_positions_when_filtering() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    home.register("user", "1234");
    home.add_task("Gym", "6AM", "1", "mon");
    home.add_task("Read", "9PM", "2", "mon");
    home.add_task("Shop", "5PM", "2", "tue");

    home.cmd()
        .args(["list", "--priority", "2", "--due", "tue"])
        .assert()
        .success()
        .stdout(contains("3. Shop").and(contains("Gym").not()));

    Ok(())
}

#[test]
fn empty_list_allowed_by_config() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    home.write_file(
        "tasker.toml",
        "[auth]\niterations = 1000\n\n[tasks]\nempty_list_is_error = false\n",
    )?;
    home.register("user", "1234");

    home.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("No tasks found."));

    Ok(())
}

#[test]
fn task_commands_require_login() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;

    home.cmd()
        .args(["add", "Gym", "--time", "6AM", "--priority", "1", "--due", "2026-02-20"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Error: You must login first"));

    home.cmd().arg("list").assert().failure().code(2);
    home.cmd().args(["delete", "1"]).assert().failure().code(2);
    home.cmd()
        .args(["update", "1", "--name", "x"])
        .assert()
        .failure()
        .code(2);

    assert!(!home.path().join("tasks").exists());
    Ok(())
}

#[test]
fn tasks_are_private_per_user() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    home.register("ana", "pw-a");
    home.add_task("Gym", "6AM", "1", "2026-02-20");
    home.register("bo", "pw-b");

    home.cmd().arg("list").assert().failure().code(2);

    home.cmd().args(["login", "ana", "pw-a"]).assert().success();
    home.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("1. Gym"));

    Ok(())
}

#[test]
fn list_json_output() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    home.register("user", "1234");
    home.add_task("Gym", "6AM", "1", "2026-02-20");

    let output = home.cmd().args(["--json", "list"]).output()?;
    assert!(output.status.success());
    let payload: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(payload["command"], Value::from("list"));
    assert_eq!(payload["data"]["total"], Value::from(1));
    let task = &payload["data"]["tasks"][0];
    assert_eq!(task["index"], Value::from(1));
    assert_eq!(task["name"], Value::from("Gym"));
    assert_eq!(task["status"], Value::from("pending"));

    let output = home.cmd().args(["--json", "delete", "9"]).output()?;
    assert_eq!(output.status.code(), Some(2));
    let payload: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(payload["command"], Value::from("delete"));
    assert_eq!(payload["error"]["kind"], Value::from("task_not_found"));
    assert_eq!(payload["error"]["details"]["index"], Value::from(9));

    Ok(())
}

#[test]
fn quiet_suppresses_success_output() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    home.register("user", "1234");

    home.cmd()
        .args(["-q", "add", "Gym", "--time", "6AM", "--priority", "1", "--due", "d"])
        .assert()
        .success()
        .stdout("");

    Ok(())
}
