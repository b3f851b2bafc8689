//! Shared application state.
//!
//! Contains the state that is shared across all request handlers,
//! including configuration, the task store and the metrics registry.

use crate::config::ConfigV1;
use crate::health::HealthReporter;
use crate::metrics::{Metrics, MetricsRecorder};
use crate::models::TaskSummary;
use crate::store::{create_store, TaskStore};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request handler and contains
/// handles to the configuration, the task store and the metrics.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// The task collection. Handlers never touch tasks except through it.
    pub store: Arc<dyn TaskStore>,
    /// Prometheus registry written by the instrumentation and read by `/metrics`.
    pub metrics: Metrics,
    pub health: HealthReporter,
}

impl AppState {
    /// Builds the store from configuration, wiring its change notifications
    /// into the task gauges.
    pub fn new(config: Arc<ConfigV1>, endpoints: &'static [&'static str]) -> Self {
        let metrics = Metrics::new();
        let gauges = metrics.clone();
        let store = create_store(
            &config.tasks,
            Arc::new(move |summary: TaskSummary| {
                gauges.set_task_gauges(summary.total, summary.completed)
            }),
        );

        AppState {
            health: HealthReporter::new(store.clone(), endpoints),
            config,
            store,
            metrics,
        }
    }
}
