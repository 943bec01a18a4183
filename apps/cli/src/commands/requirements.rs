use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::context::{AppContext, StorageArgs};

#[derive(Parser, Debug)]
pub struct RequirementsCommand {
    /// Path to the blueprint document
    pub blueprint_path: PathBuf,

    #[command(flatten)]
    pub storage: StorageArgs,
}

impl RequirementsCommand {
    pub fn execute(self) -> Result<()> {
        let ctx = AppContext::build(&self.storage)?;
        let requirements = ctx.lifecycle.requirements(&self.blueprint_path)?;

        if requirements.is_empty() {
            cliclack::log::info("This blueprint has no plugins to install.")?;
            return Ok(());
        }
        for requirement in requirements {
            println!("{requirement}");
        }
        Ok(())
    }
}
