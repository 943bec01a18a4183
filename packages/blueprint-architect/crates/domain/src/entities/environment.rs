use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::blueprint::WorkflowDeclaration;

/// The persisted execution context of an initialized blueprint.
///
/// Built by the environment-builder port, written to storage by initialize
/// (overwriting any prior environment for the same identifier), read back by
/// load and the workflow dispatcher, deleted by teardown. Exactly one exists
/// per blueprint identifier at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedEnvironment {
    /// The blueprint identifier this environment belongs to.
    pub name: String,

    /// Normalized deployment inputs.
    #[serde(default)]
    pub inputs: BTreeMap<String, Value>,

    /// Opaque provider context handed to the builder at construction time.
    #[serde(default)]
    pub provider_context: Value,

    /// Module names excluded from workflow dispatch.
    #[serde(default)]
    pub ignored_modules: Vec<String>,

    /// Declared deployment outputs, canonically key-sorted.
    #[serde(default)]
    pub outputs: BTreeMap<String, Value>,

    /// Workflows the blueprint declares beyond the built-in ones.
    #[serde(default)]
    pub workflows: BTreeMap<String, WorkflowDeclaration>,

    /// Instantiated node instances.
    #[serde(default)]
    pub node_instances: Vec<NodeInstance>,
}

impl PersistedEnvironment {
    /// Node instances, optionally filtered to a single node template.
    pub fn instances(&self, node_id: Option<&str>) -> Vec<NodeInstance> {
        match node_id {
            Some(node_id) => self
                .node_instances
                .iter()
                .filter(|instance| instance.node_id == node_id)
                .cloned()
                .collect(),
            None => self.node_instances.clone(),
        }
    }
}

/// A single instantiated node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInstance {
    /// Instance identifier, unique within the environment.
    pub id: String,

    /// The node template this instance was created from.
    pub node_id: String,

    /// Lifecycle state, driven by workflow execution.
    pub state: InstanceState,

    /// Runtime properties accumulated across workflow runs.
    #[serde(default)]
    pub runtime_properties: BTreeMap<String, Value>,
}

/// Lifecycle states a node instance moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceState {
    Uninitialized,
    Started,
    Stopped,
    Deleted,
}
