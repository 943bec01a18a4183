use std::path::Path;

use thiserror::Error;

use crate::entities::dependency::DependencySpec;

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("package not found: {0}")]
    NotFound(String),
    #[error("installation failed: {0}")]
    InstallFailed(String),
    #[error("network error: {0}")]
    NetworkError(String),
}

/// Single-dependency installation primitive.
///
/// `target` is the isolated environment's package directory. Implementations
/// must make `install` idempotent enough that re-installing an already
/// present dependency after a partial failure is safe.
pub trait PackageInstaller: Send + Sync {
    fn install(&self, dependency: &DependencySpec, target: &Path) -> Result<(), PackageError>;
    fn is_installed(&self, dependency: &DependencySpec, target: &Path)
        -> Result<bool, PackageError>;
}
