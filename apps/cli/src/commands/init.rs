use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use blueprint_architect::domain::entities::blueprint::BlueprintId;
use blueprint_architect::domain::entities::inputs::DeploymentInputs;

use crate::context::{AppContext, StorageArgs};

#[derive(Parser, Debug)]
pub struct InitCommand {
    /// Blueprint identifier
    pub blueprint_id: String,

    /// Path to the blueprint document
    #[arg(short = 'p', long)]
    pub blueprint_path: PathBuf,

    /// Deployment inputs: a YAML file path, key=value;key=value, or raw YAML
    #[arg(short, long)]
    pub inputs: Option<String>,

    /// Install the blueprint's plugins into an isolated environment
    #[arg(long)]
    pub install_plugins: bool,

    #[command(flatten)]
    pub storage: StorageArgs,
}

impl InitCommand {
    pub fn execute(self) -> Result<()> {
        cliclack::intro(console::style("Blueprint Architect").bold())?;

        let ctx = AppContext::build(&self.storage)?;
        let inputs = self
            .inputs
            .map(DeploymentInputs::Literal)
            .unwrap_or_default();

        let spinner = cliclack::spinner();
        spinner.start(format!("Initializing blueprint '{}'...", self.blueprint_id));

        match ctx.lifecycle.initialize(
            &BlueprintId::new(&self.blueprint_id),
            &self.blueprint_path,
            &inputs,
            self.install_plugins,
        ) {
            Ok(environment) => {
                spinner.stop(format!(
                    "Initialized '{}' with {} node instance(s).",
                    self.blueprint_id,
                    environment.node_instances.len()
                ));
            }
            Err(error) => {
                spinner.error("Initialization failed.");
                return Err(error.into());
            }
        }

        cliclack::outro("Environment ready.")?;
        Ok(())
    }
}
