//! Shared, append-only result set written by every scan task.

use std::sync::{Mutex, PoisonError};

use crate::Entry;

/// Records from all workers. A push is atomic with respect to other pushes; order is whatever
/// the workers produced and carries no meaning.
#[derive(Debug, Default)]
pub struct ResultSet {
    records: Mutex<Vec<Entry>>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: Entry) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of every recorded size.
    pub fn total_size(&self) -> u64 {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|e| e.size)
            .sum()
    }

    /// Copy of the records as they stand. Only complete once every task has been joined.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn into_vec(self) -> Vec<Entry> {
        self.records
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
