use serde::{Deserialize, Serialize};

/// A task record as stored and returned over HTTP.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub done: bool,
}

impl Task {
    /// Construct a new, not yet completed task.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Task {
            id,
            title: title.into(),
            done: false,
        }
    }
}

/// Task counts taken from a single consistent view of the store.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSummary {
    pub total: u64,
    pub completed: u64,
}

impl TaskSummary {
    /// Tallies a slice of tasks.
    pub fn of(tasks: &[Task]) -> Self {
        TaskSummary {
            total: tasks.len() as u64,
            completed: tasks.iter().filter(|t| t.done).count() as u64,
        }
    }

    pub fn pending(&self) -> u64 {
        self.total - self.completed
    }
}

/// Body of `POST /tasks`.
///
/// `title` stays optional here so that a missing field is a validation
/// outcome of the store rather than a deserialization failure.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct NewTask {
    #[serde(default)]
    pub title: Option<String>,
}

impl NewTask {
    /// Returns the title if one was supplied and is not blank.
    pub fn title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
    }
}
