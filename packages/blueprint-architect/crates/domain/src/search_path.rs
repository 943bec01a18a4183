use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The package search path collaborators resolve plugin packages against.
///
/// This is an explicit shared value, not process-global state: the services
/// own one and thread it through the parser, builder and engine ports. Every
/// mutation goes through a guard that removes the entry again when dropped,
/// so the path is restored on every exit path, success and error alike.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    entries: Arc<Mutex<Vec<PathBuf>>>,
}

impl SearchPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current entries, highest priority first.
    pub fn entries(&self) -> Vec<PathBuf> {
        self.lock().clone()
    }

    /// Add `entry` with lowest priority until the returned guard drops.
    pub fn append(&self, entry: PathBuf) -> SearchPathGuard {
        self.lock().push(entry.clone());
        SearchPathGuard {
            entries: Arc::clone(&self.entries),
            entry,
        }
    }

    /// Add `entry` with highest priority until the returned guard drops.
    pub fn prepend(&self, entry: PathBuf) -> SearchPathGuard {
        self.lock().insert(0, entry.clone());
        SearchPathGuard {
            entries: Arc::clone(&self.entries),
            entry,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PathBuf>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Removes its entry from the owning [`SearchPath`] on drop.
#[must_use = "the search path entry is removed as soon as the guard drops"]
pub struct SearchPathGuard {
    entries: Arc<Mutex<Vec<PathBuf>>>,
    entry: PathBuf,
}

impl Drop for SearchPathGuard {
    fn drop(&mut self) {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(position) = entries.iter().position(|entry| entry == &self.entry) {
            entries.remove(position);
        }
    }
}
