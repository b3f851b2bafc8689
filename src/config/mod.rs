// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod logging;
pub mod tasks;
pub mod types;

pub use logging::*;
pub use tasks::*;
pub use types::*;
