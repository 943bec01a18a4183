use anyhow::Result;
use clap::Parser;

use blueprint_architect::domain::entities::workflow::UNINSTALL_WORKFLOW;

use crate::commands::execute::run_workflow;
use crate::context::StorageArgs;

#[derive(Parser, Debug)]
pub struct UninstallCommand {
    /// Blueprint identifier
    pub blueprint_id: String,

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

impl UninstallCommand {
    pub fn execute(self) -> Result<()> {
        run_workflow(
            &self.storage,
            &self.blueprint_id,
            UNINSTALL_WORKFLOW,
            self.parameters.as_deref(),
            self.allow_custom_parameters,
            self.task_retries,
            self.task_retry_interval,
        )
    }
}
