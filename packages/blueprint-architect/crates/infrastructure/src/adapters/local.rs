use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};

use domain::entities::blueprint::{BlueprintId, BlueprintPlan};
use domain::entities::environment::{InstanceState, NodeInstance, PersistedEnvironment};
use domain::entities::workflow::{RetryPolicy, WorkflowRequest, INSTALL_WORKFLOW, UNINSTALL_WORKFLOW};
use domain::ports::engine::{BuildError, EngineError, EnvironmentBuilder, WorkflowEngine};
use domain::search_path::SearchPath;

/// Materializes an execution environment directly from the parsed plan.
///
/// The default implementation of the builder port: one node instance per
/// node template, declared outputs copied verbatim, provided inputs overlaid
/// on the plan's declared defaults.
pub struct LocalEnvironmentBuilder;

impl LocalEnvironmentBuilder {
    pub fn new() -> Self {
        Self
    }

    fn instance_id(node_id: &str) -> String {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("{}_{}", node_id, &suffix[..12])
    }
}

impl Default for LocalEnvironmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentBuilder for LocalEnvironmentBuilder {
    fn build(
        &self,
        plan: &BlueprintPlan,
        name: &BlueprintId,
        inputs: &BTreeMap<String, Value>,
        ignored_modules: &[String],
        provider_context: &Value,
        search_path: &SearchPath,
    ) -> Result<PersistedEnvironment, BuildError> {
        tracing::debug!(
            "building environment '{}' with search path {:?}",
            name,
            search_path.entries()
        );

        let mut merged_inputs = plan.inputs.clone();
        merged_inputs.extend(inputs.clone());

        let node_instances = plan
            .nodes
            .iter()
            .map(|node| NodeInstance {
                id: Self::instance_id(&node.id),
                node_id: node.id.clone(),
                state: InstanceState::Uninitialized,
                runtime_properties: node.properties.clone(),
            })
            .collect();

        let outputs = plan
            .outputs
            .iter()
            .map(|(key, declaration)| (key.clone(), declaration.value.clone()))
            .collect();

        Ok(PersistedEnvironment {
            name: name.to_string(),
            inputs: merged_inputs,
            provider_context: provider_context.clone(),
            ignored_modules: ignored_modules.to_vec(),
            outputs,
            workflows: plan.workflows.clone(),
            node_instances,
        })
    }
}

/// Drives node-instance lifecycle states for the built-in workflows.
///
/// `install` moves every instance to `started`, `uninstall` to `deleted`.
/// Any other workflow must be declared by the blueprint. Each node operation
/// runs under the invocation's retry policy.
pub struct LocalWorkflowEngine;

impl LocalWorkflowEngine {
    pub fn new() -> Self {
        Self
    }

    fn check_parameters(
        request: &WorkflowRequest,
        declared: &BTreeMap<String, Value>,
    ) -> Result<(), EngineError> {
        if request.allow_custom_parameters {
            return Ok(());
        }
        for parameter in request.parameters.keys() {
            if !declared.contains_key(parameter) {
                return Err(EngineError::UnexpectedParameter {
                    workflow: request.workflow.clone(),
                    parameter: parameter.clone(),
                });
            }
        }
        Ok(())
    }

    /// Run one node operation under the retry policy: -1 retries without
    /// bound, otherwise n retries with the configured pause in between.
    fn run_with_retries(
        workflow: &str,
        retry: &RetryPolicy,
        mut operation: impl FnMut() -> Result<(), String>,
    ) -> Result<(), EngineError> {
        let mut attempt: i64 = 0;
        loop {
            match operation() {
                Ok(()) => return Ok(()),
                Err(message) => {
                    if !retry.unlimited() && attempt >= retry.task_retries {
                        return Err(EngineError::Failed {
                            workflow: workflow.to_owned(),
                            message,
                        });
                    }
                    attempt += 1;
                    thread::sleep(Duration::from_secs(retry.task_retry_interval));
                }
            }
        }
    }
}

impl Default for LocalWorkflowEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowEngine for LocalWorkflowEngine {
    fn execute(
        &self,
        environment: &mut PersistedEnvironment,
        request: &WorkflowRequest,
        search_path: &SearchPath,
    ) -> Result<Value, EngineError> {
        tracing::debug!(
            "executing workflow '{}' with search path {:?}",
            request.workflow,
            search_path.entries()
        );

        let target_state = match request.workflow.as_str() {
            INSTALL_WORKFLOW => {
                Self::check_parameters(request, &BTreeMap::new())?;
                Some(InstanceState::Started)
            }
            UNINSTALL_WORKFLOW => {
                Self::check_parameters(request, &BTreeMap::new())?;
                Some(InstanceState::Deleted)
            }
            custom => {
                let declaration = environment
                    .workflows
                    .get(custom)
                    .ok_or_else(|| EngineError::UnknownWorkflow(custom.to_owned()))?;
                Self::check_parameters(request, &declaration.parameters)?;
                None
            }
        };

        for instance in &mut environment.node_instances {
            Self::run_with_retries(&request.workflow, &request.retry, || {
                if let Some(state) = target_state {
                    instance.state = state;
                }
                Ok(())
            })?;
        }

        Ok(json!({
            "workflow": request.workflow,
            "status": "terminated",
            "node_instances": environment.node_instances.len(),
        }))
    }
}
