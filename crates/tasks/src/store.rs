use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

/// A task as returned by the create endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: u64,
    pub value: String,
}

/// In-memory task storage shared by every connection.
///
/// Ids are handed out from 1 upwards and never reused, even after a delete.
#[derive(Debug, Default)]
pub struct TaskStore {
    inner: Mutex<Tasks>,
}

#[derive(Debug)]
struct Tasks {
    next_id: u64,
    values: BTreeMap<u64, String>,
}

impl Default for Tasks {
    fn default() -> Self {
        Self { next_id: 1, values: BTreeMap::new() }
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of all tasks ordered by id
    pub fn list(&self) -> BTreeMap<u64, String> {
        self.lock().values.clone()
    }

    pub fn create(&self, value: String) -> Task {
        let mut tasks = self.lock();
        let id = tasks.next_id;
        tasks.next_id += 1;
        tasks.values.insert(id, value.clone());
        Task { id, value }
    }

    pub fn get(&self, id: u64) -> Option<String> {
        self.lock().values.get(&id).cloned()
    }

    /// Replaces the value of an existing task and returns the new value.
    pub fn update(&self, id: u64, value: String) -> Option<String> {
        let mut tasks = self.lock();
        let slot = tasks.values.get_mut(&id)?;
        slot.clone_from(&value);
        Some(value)
    }

    /// Removes a task and returns the value it held.
    pub fn delete(&self, id: u64) -> Option<String> {
        self.lock().values.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().values.is_empty()
    }

    // a panic while holding the lock cannot leave the map half-written
    fn lock(&self) -> MutexGuard<'_, Tasks> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one() {
        let store = TaskStore::new();
        assert_eq!(store.create("a".into()), Task { id: 1, value: "a".into() });
        assert_eq!(store.create("b".into()), Task { id: 2, value: "b".into() });
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn ids_are_not_reused() {
        let store = TaskStore::new();
        store.create("a".into());
        store.create("b".into());

        assert_eq!(store.delete(2), Some("b".into()));
        assert_eq!(store.create("c".into()).id, 3);
        assert_eq!(store.list().keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn update_only_existing() {
        let store = TaskStore::new();
        store.create("a".into());

        assert_eq!(store.update(1, "z".into()), Some("z".into()));
        assert_eq!(store.get(1), Some("z".into()));
        assert_eq!(store.update(7, "z".into()), None);
        assert_eq!(store.get(7), None);
    }

    #[test]
    fn delete_missing() {
        let store = TaskStore::new();
        assert!(store.is_empty());
        assert_eq!(store.delete(1), None);
    }
}
