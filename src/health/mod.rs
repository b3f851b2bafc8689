//! Health and status reporting derived from the task store.

mod reporter;

pub use reporter::{HealthReport, HealthReporter, StatusReport, TaskCounts, VERSION};
