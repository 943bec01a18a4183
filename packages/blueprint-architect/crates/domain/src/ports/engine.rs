use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::entities::blueprint::{BlueprintId, BlueprintPlan};
use crate::entities::environment::PersistedEnvironment;
use crate::entities::workflow::WorkflowRequest;
use crate::search_path::SearchPath;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("environment construction failed: {0}")]
    Failed(String),
}

/// Environment-construction port.
///
/// Materializes the persisted execution context from a parsed plan. The
/// search path carries the isolated environment's packages when initialize
/// provisioned one.
pub trait EnvironmentBuilder: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    fn build(
        &self,
        plan: &BlueprintPlan,
        name: &BlueprintId,
        inputs: &BTreeMap<String, Value>,
        ignored_modules: &[String],
        provider_context: &Value,
        search_path: &SearchPath,
    ) -> Result<PersistedEnvironment, BuildError>;
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("workflow '{0}' is not declared by this blueprint")]
    UnknownWorkflow(String),

    #[error("unexpected parameter '{parameter}' for workflow '{workflow}'")]
    UnexpectedParameter { workflow: String, parameter: String },

    #[error("workflow '{workflow}' failed: {message}")]
    Failed { workflow: String, message: String },
}

/// Workflow execution port.
///
/// Runs one named workflow against a loaded environment, mutating node
/// instances in place; the dispatcher re-persists the environment afterwards.
/// The retry policy inside the request is the engine's to honor.
pub trait WorkflowEngine: Send + Sync {
    fn execute(
        &self,
        environment: &mut PersistedEnvironment,
        request: &WorkflowRequest,
        search_path: &SearchPath,
    ) -> Result<Value, EngineError>;
}
