//! tasker task command implementations.

use std::path::PathBuf;

use crate::cli::load_context;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{IndexedTask, NewTask, Priority, Task, TaskFilter, TaskPatch, TaskStatus};

pub struct AddOptions {
    pub name: String,
    pub time: String,
    pub priority: u8,
    pub due: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub status: Option<TaskStatus>,
    pub priority: Option<u8>,
    pub due: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct DeleteOptions {
    pub index: usize,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct UpdateOptions {
    pub index: usize,
    pub name: Option<String>,
    pub time: Option<String>,
    pub priority: Option<u8>,
    pub due: Option<String>,
    pub status: Option<TaskStatus>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct TaskListOutput {
    total: usize,
    tasks: Vec<IndexedTask>,
}

fn output_options(json: bool, quiet: bool) -> OutputOptions {
    OutputOptions { json, quiet }
}

fn describe(task: &Task) -> String {
    format!(
        "{} | Time: {} | Priority: {} | Due: {} | Status: {}",
        task.name, task.time, task.priority, task.due, task.status
    )
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let ctx = load_context(options.data_dir)?;
    let session = ctx.accounts.current_user()?;
    let new_task = NewTask {
        name: options.name,
        time: options.time,
        priority: Priority::new(options.priority)?,
        due: options.due,
    };
    let added = ctx.tasks.add(&session, new_task)?;

    let human = HumanOutput::new("Task added successfully!");
    emit_success(
        output_options(options.json, options.quiet),
        "add",
        &added,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(options.data_dir)?;
    let session = ctx.accounts.current_user()?;
    let filter = TaskFilter {
        status: options.status,
        priority: options.priority.map(Priority::new).transpose()?,
        due: options.due,
    };
    let tasks = ctx.tasks.list(&session, &filter)?;

    let human = if tasks.is_empty() {
        let mut human = HumanOutput::new("No tasks found.");
        human.push_next_step("tasker add <name> --time <time> --priority <1-3> --due <date>");
        human
    } else {
        HumanOutput::from_lines(
            tasks
                .iter()
                .map(|entry| format!("{}. {}", entry.index, describe(&entry.task)))
                .collect(),
        )
    };

    let output = TaskListOutput {
        total: tasks.len(),
        tasks,
    };
    emit_success(
        output_options(options.json, options.quiet),
        "list",
        &output,
        Some(&human),
    )
}

pub fn run_delete(options: DeleteOptions) -> Result<()> {
    let ctx = load_context(options.data_dir)?;
    let session = ctx.accounts.current_user()?;
    let removed = ctx.tasks.delete(&session, options.index)?;

    let human = HumanOutput::new(format!("Deleted task: {}", describe(&removed)));
    emit_success(
        output_options(options.json, options.quiet),
        "delete",
        &IndexedTask {
            index: options.index,
            task: removed,
        },
        Some(&human),
    )
}

pub fn run_update(options: UpdateOptions) -> Result<()> {
    let patch = TaskPatch {
        name: options.name,
        time: options.time,
        priority: options.priority.map(Priority::new).transpose()?,
        due: options.due,
        status: options.status,
    };
    if patch.is_empty() {
        return Err(Error::InvalidInput(
            "Provide at least one field to update".to_string(),
        ));
    }

    let ctx = load_context(options.data_dir)?;
    let session = ctx.accounts.current_user()?;
    let task = ctx.tasks.update(&session, options.index, patch)?;

    let human = HumanOutput::new("Task updated successfully!");
    emit_success(
        output_options(options.json, options.quiet),
        "update",
        &IndexedTask {
            index: options.index,
            task,
        },
        Some(&human),
    )
}
