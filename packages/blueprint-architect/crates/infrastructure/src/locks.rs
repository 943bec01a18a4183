use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use domain::entities::blueprint::BlueprintId;

/// Per-identifier lock registry.
///
/// Serializes lifecycle operations that mutate one blueprint's storage
/// (initialize, teardown): two concurrent callers for the same identifier
/// run one after the other, the second against whatever state the first
/// left behind. Different identifiers never contend.
#[derive(Debug, Default)]
pub struct IdentifierLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl IdentifierLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `operation` while holding the identifier's lock.
    pub fn with<T>(&self, id: &BlueprintId, operation: impl FnOnce() -> T) -> T {
        let slot = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(id.as_str().to_owned()).or_default())
        };
        let _held = slot.lock().unwrap_or_else(PoisonError::into_inner);
        operation()
    }
}
