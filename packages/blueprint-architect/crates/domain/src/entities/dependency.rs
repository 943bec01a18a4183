use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entities::blueprint::{BlueprintPlan, PluginDeclaration};
use crate::error::{CoreError, CoreResult};

/// A resolved plugin reference.
///
/// Equality and ordering follow the resolved source string, so a
/// `BTreeSet<DependencySpec>` holds each distinct source exactly once in a
/// deterministic order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DependencySpec {
    /// A remote source, kept verbatim as declared.
    Remote(String),

    /// A local source, resolved under the blueprint's `plugins` directory.
    Local(PathBuf),
}

impl DependencySpec {
    /// The resolved source string handed to the package installer.
    pub fn source(&self) -> String {
        match self {
            DependencySpec::Remote(url) => url.clone(),
            DependencySpec::Local(path) => path.display().to_string(),
        }
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source())
    }
}

// Equality, ordering and hashing all follow the resolved source string.
impl PartialEq for DependencySpec {
    fn eq(&self, other: &Self) -> bool {
        self.source() == other.source()
    }
}

impl Eq for DependencySpec {}

impl std::hash::Hash for DependencySpec {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.source().hash(state);
    }
}

impl Ord for DependencySpec {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.source().cmp(&other.source())
    }
}

impl PartialOrd for DependencySpec {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Extract the set of plugin sources an initialized blueprint must install.
///
/// Takes the union of deployment-wide plugins and every node's plugins that
/// carry the author's `install` signal. A source containing a scheme separator
/// is remote and kept verbatim; anything else names a file under
/// `<blueprint_dir>/plugins/`. `blueprint_dir` is expected to be absolute.
///
/// Pure transformation over the plan; no filesystem or network access.
pub fn resolve_requirements(
    plan: &BlueprintPlan,
    blueprint_dir: &Path,
) -> CoreResult<BTreeSet<DependencySpec>> {
    let mut requirements = BTreeSet::new();
    collect(&plan.deployment_plugins, blueprint_dir, &mut requirements)?;
    for node in &plan.nodes {
        collect(&node.plugins, blueprint_dir, &mut requirements)?;
    }
    Ok(requirements)
}

fn collect(
    plugins: &[PluginDeclaration],
    blueprint_dir: &Path,
    requirements: &mut BTreeSet<DependencySpec>,
) -> CoreResult<()> {
    for plugin in plugins {
        if !plugin.install {
            continue;
        }
        let source = plugin.source.as_deref().ok_or_else(|| {
            CoreError::InvalidPlan(format!(
                "plugin '{}' is marked for install but declares no source",
                plugin.name
            ))
        })?;
        if source.contains("://") {
            requirements.insert(DependencySpec::Remote(source.to_owned()));
        } else {
            requirements.insert(DependencySpec::Local(
                blueprint_dir.join("plugins").join(source),
            ));
        }
    }
    Ok(())
}
