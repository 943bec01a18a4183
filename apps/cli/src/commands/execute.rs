use anyhow::Result;
use clap::Parser;

use blueprint_architect::domain::entities::blueprint::BlueprintId;
use blueprint_architect::domain::entities::inputs::{self, DeploymentInputs};
use blueprint_architect::domain::entities::workflow::WorkflowRequest;

use crate::context::{AppContext, StorageArgs};

#[derive(Parser, Debug)]
pub struct ExecuteCommand {
    /// Blueprint identifier
    pub blueprint_id: String,

    /// Workflow name
    pub workflow: String,

    /// Workflow parameters: a YAML file path, key=value;key=value, or raw YAML
    #[arg(short, long)]
    pub parameters: Option<String>,

    /// Accept parameters the workflow does not declare
    #[arg(long)]
    pub allow_custom_parameters: bool,

    /// Task retries; -1 retries without bound
    #[arg(long)]
    pub task_retries: Option<i64>,

    /// Seconds between task retries
    #[arg(long)]
    pub task_retry_interval: Option<u64>,

    #[command(flatten)]
    pub storage: StorageArgs,
}

impl ExecuteCommand {
    pub fn execute(self) -> Result<()> {
        run_workflow(
            &self.storage,
            &self.blueprint_id,
            &self.workflow,
            self.parameters.as_deref(),
            self.allow_custom_parameters,
            self.task_retries,
            self.task_retry_interval,
        )
    }
}

/// Shared dispatch path for `execute` and the install/uninstall shortcuts.
pub(crate) fn run_workflow(
    storage: &StorageArgs,
    blueprint_id: &str,
    workflow: &str,
    parameters: Option<&str>,
    allow_custom_parameters: bool,
    task_retries: Option<i64>,
    task_retry_interval: Option<u64>,
) -> Result<()> {
    cliclack::intro(console::style("Blueprint Architect").bold())?;

    let ctx = AppContext::build(storage)?;
    let parameters = match parameters {
        Some(literal) => inputs::normalize(&DeploymentInputs::from(literal))?,
        None => Default::default(),
    };

    let mut retry = ctx.settings.default_retry_policy();
    if let Some(task_retries) = task_retries {
        retry.task_retries = task_retries;
    }
    if let Some(interval) = task_retry_interval {
        retry.task_retry_interval = interval;
    }

    cliclack::log::step(format!(
        "Running workflow '{workflow}' on '{blueprint_id}'..."
    ))?;
    let request = WorkflowRequest {
        workflow: workflow.to_owned(),
        parameters,
        allow_custom_parameters,
        retry,
    };
    let result = ctx
        .workflows
        .execute(&BlueprintId::new(blueprint_id), &request)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    cliclack::outro("Workflow complete.")?;
    Ok(())
}
