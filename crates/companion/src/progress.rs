//! Reading progress per section. Last write wins.

use std::sync::RwLock;

use readpal_core::reading::ProgressSnapshot;
use tracing::debug;

#[derive(Default)]
pub struct ProgressTracker {
    progress: RwLock<ProgressSnapshot>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite `section` with `value` and return the whole mapping.
    /// Values are stored as given; nothing is clamped.
    pub fn update(&self, section: &str, value: f64) -> ProgressSnapshot {
        let mut progress = self.progress.write().unwrap_or_else(|e| e.into_inner());
        progress.insert(section.to_string(), value);
        debug!(section, value, sections = progress.len(), "Reading progress updated");
        progress.clone()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.progress.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.progress.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.progress.write().unwrap_or_else(|e| e.into_inner()).clear();
    }
}
