use std::path::PathBuf;

use thiserror::Error;

use crate::ports::engine::{BuildError, EngineError};
use crate::ports::package_manager::PackageError;
use crate::ports::parser::ParseError;

/// Result type for lifecycle operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Failures surfaced by the blueprint lifecycle.
///
/// Collaborator errors are wrapped at the boundary where they are caught,
/// preserving the original cause; builder and engine failures pass through
/// unchanged.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The blueprint document could not be parsed.
    #[error("failed to validate blueprint: {message}")]
    Validation {
        message: String,
        #[source]
        source: ParseError,
    },

    /// The parsed plan is missing fields the resolver requires.
    #[error("invalid blueprint plan: {0}")]
    InvalidPlan(String),

    /// Deployment inputs could not be normalized to a flat mapping.
    #[error("invalid deployment inputs: {0}")]
    InvalidInput(String),

    /// A dependency failed to install into the isolated environment.
    #[error("unable to install dependency '{dependency}'")]
    Installation {
        dependency: String,
        #[source]
        source: PackageError,
    },

    /// No persisted environment exists for the identifier.
    #[error("blueprint '{0}' is not initialized")]
    NotInitialized(String),

    /// A node-instance filter matched nothing.
    #[error("{0}")]
    NotFound(String),

    /// The storage subtree is unreadable or unwritable.
    #[error("storage failure at {path}")]
    Storage {
        path: PathBuf,
        #[source]
        source: StorageCause,
    },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Underlying cause of a `CoreError::Storage`.
#[derive(Error, Debug)]
pub enum StorageCause {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

impl CoreError {
    /// Build a storage error for `path` from any supported cause.
    pub fn storage(path: impl Into<PathBuf>, source: impl Into<StorageCause>) -> Self {
        CoreError::Storage {
            path: path.into(),
            source: source.into(),
        }
    }
}
