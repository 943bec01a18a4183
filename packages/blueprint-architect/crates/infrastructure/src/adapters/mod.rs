pub mod document;
pub mod local;
pub mod pip;

pub use document::DocumentBlueprintParser;
pub use local::{LocalEnvironmentBuilder, LocalWorkflowEngine};
pub use pip::PipInstaller;
