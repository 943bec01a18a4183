pub mod engine;
pub mod package_manager;
pub mod parser;

pub use engine::{EnvironmentBuilder, WorkflowEngine};
pub use package_manager::PackageInstaller;
pub use parser::BlueprintParser;
