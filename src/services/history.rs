//! In-memory caption history for the current session.

use crate::models::HistoryItem;
use std::sync::RwLock;

/// Newest-first list of successful captions. Not persisted.
#[derive(Debug, Default)]
pub struct HistoryLog {
    items: RwLock<Vec<HistoryItem>>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item in front of all earlier ones.
    pub fn prepend(&self, item: HistoryItem) {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        items.insert(0, item);
    }

    /// Snapshot, newest first.
    pub fn items(&self) -> Vec<HistoryItem> {
        self.items
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
