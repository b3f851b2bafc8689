use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::{debug, error};

use super::{StoreError, TaskObserver, TaskStore};
use crate::config::SeedTask;
use crate::models::{Task, TaskSummary};

const TITLE_REQUIRED: &str = "Title is required";

struct Inner {
    tasks: Vec<Task>,
    /// Next id to hand out. Only ever increases, so deleted ids are never reused.
    next_id: u64,
}

/// Process-lifetime task store guarded by a single lock.
///
/// The collection and the id counter live behind the same `RwLock`:
/// mutations take the write half, `list` and `summary` share the read half.
/// The observer, if any, is told the new counts before the write half is
/// released.
pub struct MemoryStore {
    inner: RwLock<Inner>,
    observer: Option<TaskObserver>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            inner: RwLock::new(Inner {
                tasks: Vec::new(),
                next_id: 1,
            }),
            observer: None,
        }
    }

    /// Builds a store holding `seed`, with ids assigned `1..=n` in order.
    pub fn with_seed(seed: &[SeedTask]) -> Self {
        let tasks: Vec<Task> = seed
            .iter()
            .zip(1u64..)
            .map(|(entry, id)| Task {
                id,
                title: entry.title.clone(),
                done: entry.done,
            })
            .collect();
        let next_id = tasks.len() as u64 + 1;

        MemoryStore {
            inner: RwLock::new(Inner { tasks, next_id }),
            observer: None,
        }
    }

    /// Attaches `observer` and immediately reports the current counts to it.
    pub fn with_observer(mut self, observer: TaskObserver) -> Self {
        if let Ok(inner) = self.inner.get_mut() {
            observer(TaskSummary::of(&inner.tasks));
        }
        self.observer = Some(observer);
        self
    }

    /// Reports the counts of `inner`. Callers hold the write guard.
    fn publish(&self, inner: &Inner) {
        if let Some(observer) = &self.observer {
            observer(TaskSummary::of(&inner.tasks));
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner.read().map_err(|_| {
            error!("Task store lock poisoned on read");
            StoreError::Internal("task store lock poisoned".to_string())
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner.write().map_err(|_| {
            error!("Task store lock poisoned on write");
            StoreError::Internal("task store lock poisoned".to_string())
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create(&self, title: Option<&str>) -> Result<Task, StoreError> {
        let title = title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| StoreError::Validation(TITLE_REQUIRED.to_string()))?;

        let mut inner = self.write()?;
        let task = Task::new(inner.next_id, title);
        inner.next_id += 1;
        inner.tasks.push(task.clone());
        self.publish(&inner);

        debug!("Created task {}", task.id);
        Ok(task)
    }

    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.read()?.tasks.clone())
    }

    async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let mut inner = self.write()?;
        match inner.tasks.iter().position(|t| t.id == id) {
            Some(index) => {
                inner.tasks.remove(index);
                self.publish(&inner);
                debug!("Deleted task {}", id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn toggle(&self, id: u64) -> Result<Task, StoreError> {
        let mut inner = self.write()?;
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        task.done = !task.done;
        let task = task.clone();
        self.publish(&inner);

        debug!("Toggled task {} to done={}", id, task.done);
        Ok(task)
    }

    async fn summary(&self) -> Result<TaskSummary, StoreError> {
        Ok(TaskSummary::of(&self.read()?.tasks))
    }
}
