use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use super::memory_store::MemoryStore;
use crate::config::TasksConfig;
use crate::models::{Task, TaskSummary};

/// Callback receiving fresh task counts after every mutation.
///
/// Stores invoke it while the mutation's exclusive lock is still held, so
/// successive calls arrive in mutation order and the last one always
/// describes the current contents.
pub type TaskObserver = Arc<dyn Fn(TaskSummary) + Send + Sync>;

/// Outcomes a store reports instead of a successful value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("task {0} not found")]
    NotFound(u64),

    #[error("internal store error: {0}")]
    Internal(String),
}

/// The TaskStore trait abstracts task storage (create, list, delete, toggle).
///
/// Every mutation is atomic with respect to concurrent callers: ids are
/// never handed out twice and readers never observe a half-applied change.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Appends a new task. Fails with [`StoreError::Validation`] when the
    /// title is missing or blank.
    async fn create(&self, title: Option<&str>) -> Result<Task, StoreError>;

    /// All tasks in insertion order.
    async fn list(&self) -> Result<Vec<Task>, StoreError>;

    /// Removes the task with `id`. Returns whether anything was removed.
    async fn delete(&self, id: u64) -> Result<bool, StoreError>;

    /// Flips `done` on the task with `id` and returns the updated record.
    async fn toggle(&self, id: u64) -> Result<Task, StoreError>;

    /// Total and completed counts from one consistent view.
    async fn summary(&self) -> Result<TaskSummary, StoreError>;
}

/// Creates the task store, loads the configured seed tasks into it and
/// reports every change in counts to `observer`.
pub fn create_store(config: &TasksConfig, observer: TaskObserver) -> Arc<dyn TaskStore> {
    let store = MemoryStore::with_seed(&config.seed).with_observer(observer);
    info!("Created in-memory task store with {} seed task(s).", config.seed.len());
    Arc::new(store)
}
