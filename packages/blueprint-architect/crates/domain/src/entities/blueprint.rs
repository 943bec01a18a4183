use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique key for all per-blueprint state.
///
/// Used verbatim to derive the storage and installation paths, so it must be
/// stable for the lifetime of a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct BlueprintId(String);

impl BlueprintId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlueprintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BlueprintId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Parsed topology of a blueprint document.
///
/// Produced by the parser port, immutable once produced. The plan itself is
/// never persisted; only the environment derived from it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BlueprintPlan {
    /// A short, human-readable description of the deployment.
    #[serde(default)]
    pub description: Option<String>,

    /// Declared deployment inputs and their default values.
    #[serde(default)]
    pub inputs: BTreeMap<String, Value>,

    /// Deployment-wide plugin declarations.
    #[serde(default, rename = "deployment-plugins")]
    pub deployment_plugins: Vec<PluginDeclaration>,

    /// Node templates, each carrying its own plugin declarations.
    #[serde(default)]
    pub nodes: Vec<NodeTemplate>,

    /// Declared deployment outputs.
    #[serde(default)]
    pub outputs: BTreeMap<String, OutputDeclaration>,

    /// Named custom workflows the engine may dispatch.
    #[serde(default)]
    pub workflows: BTreeMap<String, WorkflowDeclaration>,
}

/// A single node template in the topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NodeTemplate {
    /// Node identifier, unique within the blueprint.
    pub id: String,

    /// Node type name, opaque to the lifecycle core.
    #[serde(default, rename = "type")]
    pub node_type: Option<String>,

    /// Node properties, copied into the instances at build time.
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,

    /// Plugins this node requires.
    #[serde(default)]
    pub plugins: Vec<PluginDeclaration>,
}

/// A plugin declaration attached to a node or to the deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PluginDeclaration {
    /// Plugin name.
    pub name: String,

    /// The author's declarative install signal. Plugins with `install: false`
    /// are never resolved into requirements, even when a source is present.
    #[serde(default = "default_install")]
    pub install: bool,

    /// A remote URL, or a filename located under the blueprint's `plugins`
    /// directory. Required when `install` is true.
    #[serde(default)]
    pub source: Option<String>,

    /// Free-form arguments forwarded to the package installer.
    #[serde(default, rename = "install-arguments")]
    pub install_arguments: Option<String>,
}

fn default_install() -> bool {
    true
}

/// A declared deployment output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct OutputDeclaration {
    #[serde(default)]
    pub description: Option<String>,

    /// The output value as declared in the document.
    pub value: Value,
}

/// A named workflow exposed by the blueprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct WorkflowDeclaration {
    #[serde(default)]
    pub description: Option<String>,

    /// Declared parameters and their default values.
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
}
