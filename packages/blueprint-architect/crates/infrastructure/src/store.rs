use std::fs;
use std::io;

use domain::entities::blueprint::BlueprintId;
use domain::entities::environment::PersistedEnvironment;
use domain::error::{CoreError, CoreResult};
use domain::storage::StorageLayout;

/// On-disk persistence for [`PersistedEnvironment`] records.
///
/// All paths come from the [`StorageLayout`], which is what lets a later
/// process find what an earlier one wrote.
#[derive(Debug, Clone)]
pub struct EnvironmentStore {
    layout: StorageLayout,
}

impl EnvironmentStore {
    pub fn new(layout: StorageLayout) -> Self {
        Self { layout }
    }

    /// Persist an environment, overwriting any prior record for the same id.
    pub fn save(&self, id: &BlueprintId, environment: &PersistedEnvironment) -> CoreResult<()> {
        let dir = self.layout.environment_dir(id);
        fs::create_dir_all(&dir).map_err(|source| CoreError::storage(&dir, source))?;

        let file = self.layout.environment_file(id);
        let payload = serde_json::to_vec_pretty(environment)
            .map_err(|source| CoreError::storage(&file, source))?;
        fs::write(&file, payload).map_err(|source| CoreError::storage(&file, source))
    }

    /// Read the environment back; absent storage means "not initialized".
    pub fn load(&self, id: &BlueprintId) -> CoreResult<PersistedEnvironment> {
        let file = self.layout.environment_file(id);
        let content = match fs::read_to_string(&file) {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(CoreError::NotInitialized(id.to_string()));
            }
            Err(source) => return Err(CoreError::storage(&file, source)),
        };
        serde_json::from_str(&content).map_err(|source| CoreError::storage(&file, source))
    }

    /// Remove the identifier's entire storage subtree. Missing storage is
    /// success; teardown's contract is "ensure absence".
    pub fn remove(&self, id: &BlueprintId) -> CoreResult<()> {
        let dir = self.layout.blueprint_dir(id);
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CoreError::storage(&dir, source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use domain::entities::environment::{InstanceState, NodeInstance};
    use tempfile::tempdir;

    fn environment(name: &str) -> PersistedEnvironment {
        PersistedEnvironment {
            name: name.to_owned(),
            inputs: BTreeMap::new(),
            provider_context: serde_json::Value::Null,
            ignored_modules: Vec::new(),
            outputs: BTreeMap::new(),
            workflows: BTreeMap::new(),
            node_instances: vec![NodeInstance {
                id: "web_abc123".into(),
                node_id: "web".into(),
                state: InstanceState::Uninitialized,
                runtime_properties: BTreeMap::new(),
            }],
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let root = tempdir().unwrap();
        let store = EnvironmentStore::new(StorageLayout::new(root.path()));
        let id = BlueprintId::from("bp1");

        store.save(&id, &environment("bp1")).unwrap();
        let loaded = store.load(&id).unwrap();
        assert_eq!(loaded, environment("bp1"));
    }

    #[test]
    fn test_save_overwrites_prior_environment() {
        let root = tempdir().unwrap();
        let store = EnvironmentStore::new(StorageLayout::new(root.path()));
        let id = BlueprintId::from("bp1");

        store.save(&id, &environment("first")).unwrap();
        store.save(&id, &environment("second")).unwrap();
        assert_eq!(store.load(&id).unwrap().name, "second");
    }

    #[test]
    fn test_load_missing_is_not_initialized() {
        let root = tempdir().unwrap();
        let store = EnvironmentStore::new(StorageLayout::new(root.path()));

        let error = store.load(&BlueprintId::from("ghost")).unwrap_err();
        assert!(matches!(error, CoreError::NotInitialized(_)));
    }

    #[test]
    fn test_remove_twice_is_idempotent() {
        let root = tempdir().unwrap();
        let store = EnvironmentStore::new(StorageLayout::new(root.path()));
        let id = BlueprintId::from("bp1");

        store.save(&id, &environment("bp1")).unwrap();
        store.remove(&id).unwrap();
        store.remove(&id).unwrap();
        assert!(!root.path().join("bp1").exists());
    }
}
