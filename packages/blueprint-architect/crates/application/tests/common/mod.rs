#![allow(dead_code)] // not every fake is exercised by every test binary

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};

use domain::entities::blueprint::{
    BlueprintId, BlueprintPlan, NodeTemplate, OutputDeclaration, PluginDeclaration,
};
use domain::entities::environment::{InstanceState, NodeInstance, PersistedEnvironment};
use domain::entities::workflow::WorkflowRequest;
use domain::ports::engine::{BuildError, EngineError, EnvironmentBuilder, WorkflowEngine};
use domain::ports::package_manager::{PackageError, PackageInstaller};
use domain::ports::parser::{BlueprintParser, ParseError};
use domain::search_path::SearchPath;

/// A parser that always returns the same plan, with a concurrency probe so
/// tests can observe whether two initialize calls overlapped.
pub struct StaticParser {
    plan: BlueprintPlan,
    concurrent: AtomicUsize,
    peak: AtomicUsize,
}

impl StaticParser {
    pub fn new(plan: BlueprintPlan) -> Self {
        Self {
            plan,
            concurrent: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl BlueprintParser for StaticParser {
    fn parse(&self, _blueprint_path: &Path) -> Result<BlueprintPlan, ParseError> {
        let now = self.concurrent.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(15));
        self.concurrent.fetch_sub(1, Ordering::SeqCst);
        Ok(self.plan.clone())
    }
}

/// A parser that rejects everything it is given.
pub struct FailingParser;

impl BlueprintParser for FailingParser {
    fn parse(&self, _blueprint_path: &Path) -> Result<BlueprintPlan, ParseError> {
        Err(ParseError::Malformed("node 'web' is undefined".into()))
    }
}

/// A builder producing a fixed, predictable environment, recording the
/// search path it was invoked with.
pub struct FixedBuilder {
    pub observed_search_path: Mutex<Vec<PathBuf>>,
}

impl FixedBuilder {
    pub fn new() -> Self {
        Self {
            observed_search_path: Mutex::new(Vec::new()),
        }
    }
}

impl EnvironmentBuilder for FixedBuilder {
    fn build(
        &self,
        plan: &BlueprintPlan,
        name: &BlueprintId,
        inputs: &BTreeMap<String, Value>,
        ignored_modules: &[String],
        provider_context: &Value,
        search_path: &SearchPath,
    ) -> Result<PersistedEnvironment, BuildError> {
        *self.observed_search_path.lock().unwrap() = search_path.entries();

        let node_instances = plan
            .nodes
            .iter()
            .map(|node| NodeInstance {
                id: format!("{}_1", node.id),
                node_id: node.id.clone(),
                state: InstanceState::Uninitialized,
                runtime_properties: BTreeMap::new(),
            })
            .collect();
        let outputs = plan
            .outputs
            .iter()
            .map(|(key, declaration)| (key.clone(), declaration.value.clone()))
            .collect();

        Ok(PersistedEnvironment {
            name: name.to_string(),
            inputs: inputs.clone(),
            provider_context: provider_context.clone(),
            ignored_modules: ignored_modules.to_vec(),
            outputs,
            workflows: plan.workflows.clone(),
            node_instances,
        })
    }
}

/// Counts install calls per source and can fail on one specific source.
pub struct CountingInstaller {
    installed: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl CountingInstaller {
    pub fn new() -> Self {
        Self {
            installed: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn failing_on(source: &str) -> Self {
        Self {
            fail_on: Some(source.to_owned()),
            ..Self::new()
        }
    }

    pub fn calls_for(&self, source: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.as_str() == source)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl PackageInstaller for CountingInstaller {
    fn install(
        &self,
        dependency: &domain::entities::dependency::DependencySpec,
        _target: &Path,
    ) -> Result<(), PackageError> {
        let source = dependency.source();
        self.calls.lock().unwrap().push(source.clone());
        if self.fail_on.as_deref() == Some(source.as_str()) {
            return Err(PackageError::InstallFailed("download refused".into()));
        }
        self.installed.lock().unwrap().insert(source);
        Ok(())
    }

    fn is_installed(
        &self,
        dependency: &domain::entities::dependency::DependencySpec,
        _target: &Path,
    ) -> Result<bool, PackageError> {
        Ok(self.installed.lock().unwrap().contains(&dependency.source()))
    }
}

/// Records executed workflow names and the search path seen mid-dispatch.
pub struct RecordingEngine {
    pub executed: Mutex<Vec<String>>,
    pub observed_search_path: Mutex<Vec<PathBuf>>,
    fail: bool,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self {
            executed: Mutex::new(Vec::new()),
            observed_search_path: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }
}

impl WorkflowEngine for RecordingEngine {
    fn execute(
        &self,
        environment: &mut PersistedEnvironment,
        request: &WorkflowRequest,
        search_path: &SearchPath,
    ) -> Result<Value, EngineError> {
        self.executed.lock().unwrap().push(request.workflow.clone());
        *self.observed_search_path.lock().unwrap() = search_path.entries();

        if self.fail {
            return Err(EngineError::Failed {
                workflow: request.workflow.clone(),
                message: "task exhausted its retries".into(),
            });
        }

        let state = match request.workflow.as_str() {
            "install" => Some(InstanceState::Started),
            "uninstall" => Some(InstanceState::Deleted),
            _ => None,
        };
        if let Some(state) = state {
            for instance in &mut environment.node_instances {
                instance.state = state;
            }
        }
        Ok(json!({
            "workflow": request.workflow,
            "status": "terminated",
        }))
    }
}

/// A plan with one install-required deployment plugin, one node-level
/// plugin, one skipped plugin and two declared outputs.
pub fn sample_plan() -> BlueprintPlan {
    BlueprintPlan {
        description: Some("two-tier sample".into()),
        deployment_plugins: vec![
            PluginDeclaration {
                name: "rest".into(),
                install: true,
                source: Some("http://example/pkg".into()),
                install_arguments: None,
            },
            PluginDeclaration {
                name: "managed".into(),
                install: false,
                source: Some("http://example/managed".into()),
                install_arguments: None,
            },
        ],
        nodes: vec![NodeTemplate {
            id: "web".into(),
            node_type: Some("host".into()),
            properties: BTreeMap::new(),
            plugins: vec![PluginDeclaration {
                name: "agent".into(),
                install: true,
                source: Some("local.zip".into()),
                install_arguments: None,
            }],
        }],
        outputs: BTreeMap::from([
            (
                "endpoint".to_owned(),
                OutputDeclaration {
                    description: None,
                    value: json!("http://web"),
                },
            ),
            (
                "admin".to_owned(),
                OutputDeclaration {
                    description: None,
                    value: json!(8080),
                },
            ),
        ]),
        ..Default::default()
    }
}

/// Write a placeholder blueprint file so paths resolve; the fake parsers
/// never read it.
pub fn write_blueprint(dir: &Path) -> PathBuf {
    let path = dir.join("blueprint.yaml");
    fs::write(&path, "nodes: []\n").unwrap();
    path
}

/// Expected requirement set for [`sample_plan`].
pub fn sample_requirements(blueprint_dir: &Path) -> BTreeSet<String> {
    BTreeSet::from([
        "http://example/pkg".to_owned(),
        blueprint_dir
            .join("plugins")
            .join("local.zip")
            .display()
            .to_string(),
    ])
}
