use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use domain::entities::blueprint::BlueprintId;
use domain::entities::workflow::{
    RetryPolicy, WorkflowRequest, INSTALL_WORKFLOW, UNINSTALL_WORKFLOW,
};
use domain::error::CoreResult;
use domain::ports::engine::WorkflowEngine;
use domain::search_path::SearchPath;
use domain::storage::StorageLayout;
use infrastructure::store::EnvironmentStore;

/// Dispatches named workflows against a loaded environment.
///
/// The blueprint's isolated packages are put at the front of the search path
/// for the duration of the engine call and removed again on every exit path,
/// success and failure alike. Engine results and errors pass through
/// unchanged.
pub struct WorkflowService {
    layout: StorageLayout,
    store: EnvironmentStore,
    interpreter: String,
    engine: Arc<dyn WorkflowEngine>,
    search_path: SearchPath,
}

impl WorkflowService {
    pub fn new(
        layout: StorageLayout,
        interpreter: impl Into<String>,
        engine: Arc<dyn WorkflowEngine>,
        search_path: SearchPath,
    ) -> Self {
        Self {
            store: EnvironmentStore::new(layout.clone()),
            layout,
            interpreter: interpreter.into(),
            engine,
            search_path,
        }
    }

    /// Run one workflow invocation against the identifier's environment.
    pub fn execute(&self, id: &BlueprintId, request: &WorkflowRequest) -> CoreResult<Value> {
        // Resolved independently of whether initialize created it; absent
        // directories are simply never hit by the engine.
        let site_packages = self.layout.site_packages(id, &self.interpreter);
        let _scope = self.search_path.prepend(site_packages);

        let mut environment = self.store.load(id)?;
        let result = self
            .engine
            .execute(&mut environment, request, &self.search_path)
            .map_err(|error| {
                tracing::error!(
                    "workflow '{}' failed for blueprint '{}': {}",
                    request.workflow,
                    id,
                    error
                );
                error
            })?;

        // Re-persist so later instance queries observe the new states.
        self.store.save(id, &environment)?;
        Ok(result)
    }

    /// Convenience wrapper fixing the workflow name to `install`.
    pub fn install(
        &self,
        id: &BlueprintId,
        parameters: BTreeMap<String, Value>,
        allow_custom_parameters: bool,
        retry: RetryPolicy,
    ) -> CoreResult<Value> {
        self.execute(
            id,
            &WorkflowRequest {
                workflow: INSTALL_WORKFLOW.to_owned(),
                parameters,
                allow_custom_parameters,
                retry,
            },
        )
    }

    /// Convenience wrapper fixing the workflow name to `uninstall`.
    pub fn uninstall(
        &self,
        id: &BlueprintId,
        parameters: BTreeMap<String, Value>,
        allow_custom_parameters: bool,
        retry: RetryPolicy,
    ) -> CoreResult<Value> {
        self.execute(
            id,
            &WorkflowRequest {
                workflow: UNINSTALL_WORKFLOW.to_owned(),
                parameters,
                allow_custom_parameters,
                retry,
            },
        )
    }
}
