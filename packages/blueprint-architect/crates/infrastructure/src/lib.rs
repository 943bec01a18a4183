pub mod adapters;
pub mod installer;
pub mod locks;
pub mod store;

pub use installer::IsolatedInstaller;
pub use locks::IdentifierLocks;
pub use store::EnvironmentStore;
