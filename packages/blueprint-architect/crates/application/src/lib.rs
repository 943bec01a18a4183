pub mod lifecycle;
pub mod settings;
pub mod workflows;

pub use lifecycle::LifecycleService;
pub use settings::Settings;
pub use workflows::WorkflowService;
