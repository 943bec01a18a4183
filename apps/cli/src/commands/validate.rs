use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::context::{AppContext, StorageArgs};

#[derive(Parser, Debug)]
pub struct ValidateCommand {
    /// Path to the blueprint document
    pub blueprint_path: PathBuf,

    #[command(flatten)]
    pub storage: StorageArgs,
}

impl ValidateCommand {
    pub fn execute(self) -> Result<()> {
        cliclack::intro(console::style("Blueprint Architect").bold())?;

        let ctx = AppContext::build(&self.storage)?;
        let plan = ctx.lifecycle.validate(&self.blueprint_path)?;

        cliclack::log::success(format!(
            "Blueprint is valid: {} node(s), {} plugin declaration(s)",
            plan.nodes.len(),
            plan.deployment_plugins.len()
                + plan.nodes.iter().map(|node| node.plugins.len()).sum::<usize>()
        ))?;
        cliclack::outro("Done.")?;
        Ok(())
    }
}
