//! Personal task lists.
//!
//! Each user owns one JSON array of tasks in `tasks/<username>.json`. A task
//! is addressed by its 1-based position in that array, so deleting a task
//! shifts every later index down by one.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::TasksConfig;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority, 1 (highest) to 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidInput(format!(
                "priority must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Priority::new(value).map_err(|err| err.to_string())
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub time: String,
    pub priority: Priority,
    pub due: String,
    pub status: TaskStatus,
}

/// Fields for a new task; status always starts as pending.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub time: String,
    pub priority: Priority,
    pub due: String,
}

impl NewTask {
    fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        require_text("time", &self.time)?;
        require_text("due", &self.due)?;
        Ok(())
    }

    fn into_task(self) -> Task {
        Task {
            name: self.name,
            time: self.time,
            priority: self.priority,
            due: self.due,
            status: TaskStatus::Pending,
        }
    }
}

/// Partial update: every `Some` field replaces the stored value.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub time: Option<String>,
    pub priority: Option<Priority>,
    pub due: Option<String>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.time.is_none()
            && self.priority.is_none()
            && self.due.is_none()
            && self.status.is_none()
    }

    fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::InvalidInput(
                "Provide at least one field to update".to_string(),
            ));
        }
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(time) = &self.time {
            require_text("time", time)?;
        }
        if let Some(due) = &self.due {
            require_text("due", due)?;
        }
        Ok(())
    }

    fn apply(self, task: &mut Task) {
        if let Some(name) = self.name {
            task.name = name;
        }
        if let Some(time) = self.time {
            task.time = time;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due) = self.due {
            task.due = due;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Exact-match filters, combined with AND. `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due: Option<String>,
}

impl TaskFilter {
    fn validate(&self) -> Result<()> {
        if let Some(due) = &self.due {
            require_text("due", due)?;
        }
        Ok(())
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |status| task.status == status)
            && self.priority.map_or(true, |priority| task.priority == priority)
            && self.due.as_deref().map_or(true, |due| task.due == due)
    }
}

/// A task together with its 1-based position in the owner's full list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedTask {
    pub index: usize,
    #[serde(flatten)]
    pub task: Task,
}

#[derive(Debug, Clone)]
pub struct TaskStore {
    storage: Storage,
    config: TasksConfig,
}

impl TaskStore {
    pub fn new(storage: Storage, config: TasksConfig) -> Self {
        Self { storage, config }
    }

    pub fn task_file(&self, session: &Session) -> PathBuf {
        self.storage.task_file(session.username())
    }

    /// Load the session user's full list; a missing file is an empty list.
    pub fn load(&self, session: &Session) -> Result<Vec<Task>> {
        self.storage.read_json_or_default(&self.task_file(session))
    }

    /// Append a pending task and return it with its index.
    pub fn add(&self, session: &Session, new_task: NewTask) -> Result<IndexedTask> {
        new_task.validate()?;
        let task = new_task.into_task();
        let added = self
            .storage
            .update_json(&self.task_file(session), |tasks: &mut Vec<Task>| {
                tasks.push(task.clone());
                Ok(IndexedTask {
                    index: tasks.len(),
                    task,
                })
            })?;
        tracing::debug!(user = session.username(), index = added.index, "task added");
        Ok(added)
    }

    /// Replace the provided fields of task `index` and return the result.
    pub fn update(&self, session: &Session, index: usize, patch: TaskPatch) -> Result<Task> {
        patch.validate()?;
        let updated = self
            .storage
            .update_json(&self.task_file(session), |tasks: &mut Vec<Task>| {
                let slot = position(index, tasks.len())?;
                let task = &mut tasks[slot];
                patch.apply(task);
                Ok(task.clone())
            })?;
        tracing::debug!(user = session.username(), index, "task updated");
        Ok(updated)
    }

    /// Remove task `index` and return it. Later tasks move up one position.
    pub fn delete(&self, session: &Session, index: usize) -> Result<Task> {
        let removed = self
            .storage
            .update_json(&self.task_file(session), |tasks: &mut Vec<Task>| {
                let slot = position(index, tasks.len())?;
                Ok(tasks.remove(slot))
            })?;
        tracing::debug!(user = session.username(), index, "task deleted");
        Ok(removed)
    }

    /// Tasks matching `filter`, in list order. A blank `due` filter is
    /// rejected rather than matched against empty due dates.
    ///
    /// An empty result fails with [`Error::NoMatchingTasks`] unless
    /// `tasks.empty_list_is_error` is off.
    pub fn list(&self, session: &Session, filter: &TaskFilter) -> Result<Vec<IndexedTask>> {
        filter.validate()?;
        let matching: Vec<IndexedTask> = self
            .load(session)?
            .into_iter()
            .enumerate()
            .filter(|(_, task)| filter.matches(task))
            .map(|(slot, task)| IndexedTask {
                index: slot + 1,
                task,
            })
            .collect();

        if matching.is_empty() && self.config.empty_list_is_error {
            return Err(Error::NoMatchingTasks);
        }
        Ok(matching)
    }
}

fn position(index: usize, len: usize) -> Result<usize> {
    if index == 0 || index > len {
        return Err(Error::TaskNotFound(index));
    }
    Ok(index - 1)
}
