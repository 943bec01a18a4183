use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use domain::entities::blueprint::BlueprintId;
use domain::entities::dependency::DependencySpec;
use domain::error::{CoreError, CoreResult};
use domain::ports::package_manager::PackageInstaller;
use domain::storage::StorageLayout;

/// Provisions a private package environment per blueprint.
///
/// The environment is opened if it already exists and created otherwise;
/// each dependency is installed at most once, checked by membership before
/// every install. A failed install aborts the whole call, but dependencies
/// installed earlier in the same call stay in place: they are idempotent to
/// re-install on retry.
pub struct IsolatedInstaller {
    layout: StorageLayout,
    interpreter: String,
    installer: Arc<dyn PackageInstaller>,
}

impl IsolatedInstaller {
    pub fn new(
        layout: StorageLayout,
        interpreter: impl Into<String>,
        installer: Arc<dyn PackageInstaller>,
    ) -> Self {
        Self {
            layout,
            interpreter: interpreter.into(),
            installer,
        }
    }

    /// Ensure every requirement is installed in the blueprint's isolated
    /// environment.
    ///
    /// Returns the installed-packages path on success, or `None` when
    /// installation is disabled or there is nothing to install; `None` means
    /// "use the ambient package set" and no environment is created.
    pub fn ensure_installed(
        &self,
        id: &BlueprintId,
        requirements: &BTreeSet<DependencySpec>,
        install_enabled: bool,
    ) -> CoreResult<Option<PathBuf>> {
        if !install_enabled {
            tracing::debug!("plugin installation disabled for '{}'", id);
            return Ok(None);
        }
        if requirements.is_empty() {
            tracing::debug!("there are no plugins to install for '{}'", id);
            return Ok(None);
        }

        let site_packages = self.layout.site_packages(id, &self.interpreter);
        // Open-or-create: an existing environment is reused, never recreated.
        fs::create_dir_all(&site_packages)
            .map_err(|source| CoreError::storage(&site_packages, source))?;

        for requirement in requirements {
            let installed = self
                .installer
                .is_installed(requirement, &site_packages)
                .map_err(|source| CoreError::Installation {
                    dependency: requirement.source(),
                    source,
                })?;
            if installed {
                continue;
            }
            self.installer
                .install(requirement, &site_packages)
                .map_err(|source| {
                    let error = CoreError::Installation {
                        dependency: requirement.source(),
                        source,
                    };
                    tracing::error!("unable to install dependencies: {}", error);
                    error
                })?;
            tracing::info!("installed dependency: {}", requirement);
        }

        tracing::info!(
            "isolated environment {} was used or created",
            self.layout.venv_dir(id).display()
        );
        Ok(Some(site_packages))
    }
}
