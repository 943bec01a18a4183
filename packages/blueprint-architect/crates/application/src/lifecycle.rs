use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use domain::entities::blueprint::{BlueprintId, BlueprintPlan};
use domain::entities::dependency::{resolve_requirements, DependencySpec};
use domain::entities::environment::{NodeInstance, PersistedEnvironment};
use domain::entities::inputs::{self, DeploymentInputs};
use domain::error::{CoreError, CoreResult};
use domain::ports::engine::EnvironmentBuilder;
use domain::ports::package_manager::PackageInstaller;
use domain::ports::parser::BlueprintParser;
use domain::search_path::SearchPath;
use domain::storage::StorageLayout;
use infrastructure::installer::IsolatedInstaller;
use infrastructure::locks::IdentifierLocks;
use infrastructure::store::EnvironmentStore;

use crate::settings::Settings;

/// Orchestrates a blueprint's environment lifecycle.
///
/// Composes the dependency resolver and the isolated installer, and
/// delegates parsing and environment construction to the collaborator
/// ports. Per identifier the reachable states are
/// `Unvalidated → Initialized → (Executing)* → TornDown`; `Executing` is
/// transient and never persisted.
pub struct LifecycleService {
    layout: StorageLayout,
    store: EnvironmentStore,
    settings: Settings,
    parser: Arc<dyn BlueprintParser>,
    builder: Arc<dyn EnvironmentBuilder>,
    installer: IsolatedInstaller,
    locks: IdentifierLocks,
    search_path: SearchPath,
}

impl LifecycleService {
    pub fn new(
        storage_root: impl Into<PathBuf>,
        settings: Settings,
        parser: Arc<dyn BlueprintParser>,
        builder: Arc<dyn EnvironmentBuilder>,
        package_installer: Arc<dyn PackageInstaller>,
    ) -> Self {
        let layout = StorageLayout::new(storage_root);
        let installer = IsolatedInstaller::new(
            layout.clone(),
            settings.interpreter.clone(),
            package_installer,
        );
        Self {
            store: EnvironmentStore::new(layout.clone()),
            layout,
            settings,
            parser,
            builder,
            installer,
            locks: IdentifierLocks::new(),
            search_path: SearchPath::new(),
        }
    }

    /// Storage locations, shared with the workflow dispatcher.
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// The package search path, shared with the workflow dispatcher.
    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validate a blueprint document without touching any state.
    pub fn validate(&self, blueprint_path: &Path) -> CoreResult<BlueprintPlan> {
        self.parser.parse(blueprint_path).map_err(|source| {
            tracing::error!("blueprint validation failed: {}", source);
            CoreError::Validation {
                message: source.to_string(),
                source,
            }
        })
    }

    /// The plugins an initialize call would install, without touching
    /// storage.
    pub fn requirements(&self, blueprint_path: &Path) -> CoreResult<BTreeSet<DependencySpec>> {
        let plan = self.validate(blueprint_path)?;
        resolve_requirements(&plan, &blueprint_dir(blueprint_path)?)
    }

    /// Validate, provision storage and dependencies, build and persist the
    /// environment. Overwrites any prior environment for the same id.
    ///
    /// Concurrent calls for the same identifier serialize on a
    /// per-identifier lock; different identifiers are independent.
    pub fn initialize(
        &self,
        id: &BlueprintId,
        blueprint_path: &Path,
        inputs: &DeploymentInputs,
        install_plugins: bool,
    ) -> CoreResult<PersistedEnvironment> {
        self.locks.with(id, || {
            match self.initialize_locked(id, blueprint_path, inputs, install_plugins) {
                Ok(environment) => Ok(environment),
                Err(error) => {
                    tracing::error!("initialization of blueprint '{}' failed: {}", id, error);
                    Err(error)
                }
            }
        })
    }

    fn initialize_locked(
        &self,
        id: &BlueprintId,
        blueprint_path: &Path,
        inputs: &DeploymentInputs,
        install_plugins: bool,
    ) -> CoreResult<PersistedEnvironment> {
        let plan = self.validate(blueprint_path)?;
        let requirements = resolve_requirements(&plan, &blueprint_dir(blueprint_path)?)?;

        let installed = self
            .installer
            .ensure_installed(id, &requirements, install_plugins)?;
        // Installed packages stay visible only for the duration of this call.
        let _scope = installed.map(|site_packages| self.search_path.append(site_packages));

        let inputs = inputs::normalize(inputs)?;
        let environment = self.builder.build(
            &plan,
            id,
            &inputs,
            &self.settings.ignored_modules,
            &self.settings.provider_context,
            &self.search_path,
        )?;

        self.store.save(id, &environment)?;
        Ok(environment)
    }

    /// Load the persisted environment for an identifier.
    pub fn load(&self, id: &BlueprintId) -> CoreResult<PersistedEnvironment> {
        self.store.load(id)
    }

    /// Remove the identifier's entire storage subtree. Idempotent.
    pub fn teardown(&self, id: &BlueprintId) -> CoreResult<()> {
        self.locks.with(id, || self.store.remove(id))
    }

    /// Declared deployment outputs, canonically key-sorted.
    pub fn outputs(&self, id: &BlueprintId) -> CoreResult<Value> {
        let environment = self.store.load(id)?;
        let outputs: serde_json::Map<String, Value> = environment
            .outputs
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(Value::Object(outputs))
    }

    /// Node instances, optionally filtered to one node template.
    pub fn instances(
        &self,
        id: &BlueprintId,
        node_id: Option<&str>,
    ) -> CoreResult<Vec<NodeInstance>> {
        let environment = self.store.load(id)?;
        let instances = environment.instances(node_id);
        match node_id {
            Some(node_id) if instances.is_empty() => {
                Err(CoreError::NotFound(format!("no node with id: {node_id}")))
            }
            _ => Ok(instances),
        }
    }
}

/// The directory local plugin sources resolve against, as an absolute path.
fn blueprint_dir(blueprint_path: &Path) -> CoreResult<PathBuf> {
    let dir = match blueprint_path.parent() {
        Some(parent) if parent != Path::new("") => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    dir.canonicalize()
        .map_err(|source| CoreError::storage(&dir, source))
}
