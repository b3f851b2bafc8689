use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::models::TaskSummary;
use crate::store::{StoreError, TaskStore};

/// Version reported by `/health` and `/status`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const CHECK_OK: &str = "ok";

/// Body of a successful `/health` response.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub checks: BTreeMap<&'static str, &'static str>,
}

/// Body of a `/status` response.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub metrics: TaskCounts,
    pub endpoints: Vec<&'static str>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskCounts {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub pending_tasks: u64,
}

impl From<TaskSummary> for TaskCounts {
    fn from(summary: TaskSummary) -> Self {
        TaskCounts {
            total_tasks: summary.total,
            completed_tasks: summary.completed,
            pending_tasks: summary.pending(),
        }
    }
}

/// Computes health and status summaries on demand.
#[derive(Clone)]
pub struct HealthReporter {
    store: Arc<dyn TaskStore>,
    endpoints: &'static [&'static str],
}

impl HealthReporter {
    pub fn new(store: Arc<dyn TaskStore>, endpoints: &'static [&'static str]) -> Self {
        HealthReporter { store, endpoints }
    }

    /// Liveness report. The task store check only passes if the store can
    /// produce a summary; the metrics check is static.
    pub async fn health(&self) -> Result<HealthReport, StoreError> {
        self.store.summary().await?;

        let checks = BTreeMap::from([("task_store", CHECK_OK), ("metrics", CHECK_OK)]);
        Ok(HealthReport {
            status: "ok",
            timestamp: now(),
            version: VERSION,
            checks,
        })
    }

    /// Service status with task counts taken from one snapshot of the store.
    pub async fn status(&self) -> Result<StatusReport, StoreError> {
        let tasks = self.store.list().await?;
        Ok(StatusReport {
            status: "running",
            timestamp: now(),
            version: VERSION,
            metrics: TaskSummary::of(&tasks).into(),
            endpoints: self.endpoints.to_vec(),
        })
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
