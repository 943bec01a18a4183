use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Workflow name fixed by the `install` convenience wrapper.
pub const INSTALL_WORKFLOW: &str = "install";

/// Workflow name fixed by the `uninstall` convenience wrapper.
pub const UNINSTALL_WORKFLOW: &str = "uninstall";

/// Retry behavior attached to a single workflow invocation.
///
/// Not persisted; the dispatcher passes it through to the engine untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Number of task retries; -1 retries without bound.
    pub task_retries: i64,

    /// Seconds to wait between retries.
    pub task_retry_interval: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            task_retries: -1,
            task_retry_interval: 30,
        }
    }
}

impl RetryPolicy {
    pub fn unlimited(&self) -> bool {
        self.task_retries < 0
    }
}

/// A single workflow invocation handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRequest {
    /// Workflow name; anything beyond the built-in names is a custom workflow
    /// and passes through verbatim.
    pub workflow: String,

    /// Invocation parameters.
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,

    /// Whether parameters absent from the workflow declaration are accepted.
    #[serde(default)]
    pub allow_custom_parameters: bool,

    /// Retry behavior for this invocation.
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl WorkflowRequest {
    pub fn new(workflow: impl Into<String>) -> Self {
        Self {
            workflow: workflow.into(),
            parameters: BTreeMap::new(),
            allow_custom_parameters: false,
            retry: RetryPolicy::default(),
        }
    }
}
