use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use domain::entities::dependency::DependencySpec;
use domain::ports::package_manager::{PackageError, PackageInstaller};

/// Installs plugin sources with the interpreter's pip into a target
/// directory.
///
/// Membership is tracked through receipt files under the target, so a
/// partially failed batch can be resumed without reinstalling what already
/// succeeded.
pub struct PipInstaller {
    interpreter: String,
}

impl PipInstaller {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    fn receipt_path(target: &Path, dependency: &DependencySpec) -> PathBuf {
        let sanitized: String = dependency
            .source()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        target.join(".receipts").join(format!("{sanitized}.installed"))
    }
}

impl PackageInstaller for PipInstaller {
    fn install(&self, dependency: &DependencySpec, target: &Path) -> Result<(), PackageError> {
        let interpreter = which::which(&self.interpreter)
            .map_err(|_| PackageError::NotFound(self.interpreter.clone()))?;

        let status = Command::new(interpreter)
            .args(["-m", "pip", "install", "--quiet", "--target"])
            .arg(target)
            .arg(dependency.source())
            .status()
            .map_err(|error| PackageError::InstallFailed(error.to_string()))?;

        if !status.success() {
            return Err(PackageError::InstallFailed(format!(
                "pip exited with {status} for '{dependency}'"
            )));
        }

        let receipt = Self::receipt_path(target, dependency);
        if let Some(parent) = receipt.parent() {
            fs::create_dir_all(parent)
                .map_err(|error| PackageError::InstallFailed(error.to_string()))?;
        }
        fs::write(&receipt, dependency.source())
            .map_err(|error| PackageError::InstallFailed(error.to_string()))
    }

    fn is_installed(
        &self,
        dependency: &DependencySpec,
        target: &Path,
    ) -> Result<bool, PackageError> {
        Ok(Self::receipt_path(target, dependency).exists())
    }
}
