use std::path::{Path, PathBuf};

use crate::entities::blueprint::BlueprintId;

/// Deterministic per-blueprint storage locations.
///
/// Pure path construction over a configured root; never touches the
/// filesystem and never fails. The same inputs yield the same paths across
/// process restarts, which is what lets load and teardown find what
/// initialize created. The `environment` and `venv` subtrees are distinct, so
/// the persisted environment and the isolated installation never collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The identifier's whole storage subtree; teardown removes this.
    pub fn blueprint_dir(&self, id: &BlueprintId) -> PathBuf {
        self.root.join(id.as_str())
    }

    /// Directory holding the serialized persisted environment.
    pub fn environment_dir(&self, id: &BlueprintId) -> PathBuf {
        self.blueprint_dir(id).join("environment")
    }

    /// The persisted environment record itself.
    pub fn environment_file(&self, id: &BlueprintId) -> PathBuf {
        self.environment_dir(id).join("environment.json")
    }

    /// Root of the isolated dependency installation.
    pub fn venv_dir(&self, id: &BlueprintId) -> PathBuf {
        self.blueprint_dir(id).join("venv")
    }

    /// The installed-packages directory, organized by interpreter identifier.
    pub fn site_packages(&self, id: &BlueprintId, interpreter: &str) -> PathBuf {
        self.venv_dir(id)
            .join("lib")
            .join(interpreter)
            .join("site-packages")
    }
}
