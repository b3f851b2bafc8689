//! Library exports for taskmon, shared between the binary and tests.

pub mod config;
pub mod health;
pub mod instrumentation;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod startup;
pub mod state;
pub mod store;
pub mod utils;
