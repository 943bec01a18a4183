use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use blueprint_architect::application::{LifecycleService, Settings, WorkflowService};
use blueprint_architect::infrastructure::adapters::{
    DocumentBlueprintParser, LocalEnvironmentBuilder, LocalWorkflowEngine, PipInstaller,
};

/// Storage and configuration flags shared by every command.
#[derive(Args, Debug, Clone)]
pub struct StorageArgs {
    /// Root directory for persisted blueprint state
    #[arg(long, default_value = "local-storage")]
    pub storage_dir: PathBuf,

    /// Optional settings file (TOML, YAML or JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// The wired-up services every command runs against.
pub struct AppContext {
    pub lifecycle: LifecycleService,
    pub workflows: WorkflowService,
    pub settings: Settings,
}

impl AppContext {
    pub fn build(storage: &StorageArgs) -> Result<Self> {
        let settings = load_settings(storage.config.as_deref())?;

        let lifecycle = LifecycleService::new(
            &storage.storage_dir,
            settings.clone(),
            Arc::new(DocumentBlueprintParser::new()),
            Arc::new(LocalEnvironmentBuilder::new()),
            Arc::new(PipInstaller::new(&settings.interpreter)),
        );
        let workflows = WorkflowService::new(
            lifecycle.layout().clone(),
            settings.interpreter.clone(),
            Arc::new(LocalWorkflowEngine::new()),
            lifecycle.search_path().clone(),
        );

        Ok(Self {
            lifecycle,
            workflows,
            settings,
        })
    }
}

/// Read settings by extension; no file means defaults.
fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

    match path.extension().and_then(|extension| extension.to_str()) {
        Some("toml") => toml::from_str(&content).context("Failed to parse TOML settings"),
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&content).context("Failed to parse YAML settings")
        }
        Some("json") => serde_json::from_str(&content).context("Failed to parse JSON settings"),
        _ => anyhow::bail!("Unsupported settings format: {}", path.display()),
    }
}
