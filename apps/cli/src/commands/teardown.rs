use anyhow::Result;
use clap::Parser;

use blueprint_architect::domain::entities::blueprint::BlueprintId;

use crate::context::{AppContext, StorageArgs};

#[derive(Parser, Debug)]
pub struct TeardownCommand {
    /// Blueprint identifier
    pub blueprint_id: String,

    #[command(flatten)]
    pub storage: StorageArgs,
}

impl TeardownCommand {
    pub fn execute(self) -> Result<()> {
        let ctx = AppContext::build(&self.storage)?;
        ctx.lifecycle.teardown(&BlueprintId::new(&self.blueprint_id))?;
        cliclack::log::success(format!(
            "Removed persisted state for '{}'.",
            self.blueprint_id
        ))?;
        Ok(())
    }
}
