use serde::{Deserialize, Serialize};
use serde_json::Value;

use domain::entities::workflow::RetryPolicy;

/// Process-wide configuration consumed, not owned, by the services.
///
/// Every field is named, typed and defaulted, so an absent or partial
/// configuration file is always valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Interpreter identifier used in the isolated environment's package
    /// path (`venv/lib/<interpreter>/site-packages`).
    pub interpreter: String,

    /// Module names the environment builder excludes from workflow dispatch.
    pub ignored_modules: Vec<String>,

    /// Opaque provider context handed to the environment builder.
    pub provider_context: Value,

    /// Default task retry count for workflow invocations; -1 retries
    /// without bound.
    pub task_retries: i64,

    /// Default seconds between task retries.
    pub task_retry_interval: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_owned(),
            ignored_modules: Vec::new(),
            provider_context: Value::Object(Default::default()),
            task_retries: -1,
            task_retry_interval: 30,
        }
    }
}

impl Settings {
    /// The retry policy used when an invocation does not override it.
    pub fn default_retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            task_retries: self.task_retries,
            task_retry_interval: self.task_retry_interval,
        }
    }
}
