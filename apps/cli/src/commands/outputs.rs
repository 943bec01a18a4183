use anyhow::Result;
use clap::Parser;

use blueprint_architect::domain::entities::blueprint::BlueprintId;

use crate::context::{AppContext, StorageArgs};

#[derive(Parser, Debug)]
pub struct OutputsCommand {
    /// Blueprint identifier
    pub blueprint_id: String,

    #[command(flatten)]
    pub storage: StorageArgs,
}

impl OutputsCommand {
    pub fn execute(self) -> Result<()> {
        let ctx = AppContext::build(&self.storage)?;
        let outputs = ctx.lifecycle.outputs(&BlueprintId::new(&self.blueprint_id))?;
        println!("{}", serde_json::to_string_pretty(&outputs)?);
        Ok(())
    }
}
