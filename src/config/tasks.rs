use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings for the task store.
///
/// `seed` lists the tasks present at startup. They receive ids `1..=n`
/// in the order given.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct TasksConfig {
    #[serde(default)]
    pub seed: Vec<SeedTask>,
}

/// A single task loaded at startup.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct SeedTask {
    pub title: String,
    #[serde(default)]
    pub done: bool,
}
