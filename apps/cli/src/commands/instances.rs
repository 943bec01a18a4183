use anyhow::Result;
use clap::Parser;

use blueprint_architect::domain::entities::blueprint::BlueprintId;

use crate::context::{AppContext, StorageArgs};

#[derive(Parser, Debug)]
pub struct InstancesCommand {
    /// Blueprint identifier
    pub blueprint_id: String,

    /// Restrict to instances of a single node
    #[arg(long)]
    pub node_id: Option<String>,

    #[command(flatten)]
    pub storage: StorageArgs,
}

impl InstancesCommand {
    pub fn execute(self) -> Result<()> {
        let ctx = AppContext::build(&self.storage)?;
        let instances = ctx.lifecycle.instances(
            &BlueprintId::new(&self.blueprint_id),
            self.node_id.as_deref(),
        )?;
        println!("{}", serde_json::to_string_pretty(&instances)?);
        Ok(())
    }
}
