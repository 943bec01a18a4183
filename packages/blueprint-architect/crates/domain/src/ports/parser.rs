use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::entities::blueprint::BlueprintPlan;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("cannot read blueprint at {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported blueprint format: {0}")]
    UnsupportedFormat(String),

    #[error("malformed blueprint document: {0}")]
    Malformed(String),
}

/// Topology parser port.
///
/// Given a blueprint path, produce a plan or a parse diagnostic. The core
/// never inspects the document itself; everything it knows about a blueprint
/// comes through this seam.
pub trait BlueprintParser: Send + Sync {
    fn parse(&self, blueprint_path: &Path) -> Result<BlueprintPlan, ParseError>;
}
