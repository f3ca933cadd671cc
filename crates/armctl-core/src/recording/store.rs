//! In-memory collection of finalized recordings.

use std::collections::HashMap;

use super::model::Recording;

/// Finalized recordings in creation order, with a name index.
///
/// Names are unique keys. Adding a recording under a name that is already
/// taken repoints the name at the newer recording; the older one stays
/// reachable by index.
#[derive(Debug, Default)]
pub struct RecordingStore {
    past_recordings: Vec<Recording>,
    name_index: HashMap<String, usize>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a recording and returns its index.
    pub fn add(&mut self, recording: Recording) -> usize {
        let index = self.past_recordings.len();
        self.name_index.insert(recording.name().to_string(), index);
        self.past_recordings.push(recording);
        index
    }

    pub fn by_name(&self, name: &str) -> Option<&Recording> {
        self.name_index
            .get(name)
            .and_then(|index| self.past_recordings.get(*index))
    }

    pub fn by_index(&self, index: usize) -> Option<&Recording> {
        self.past_recordings.get(index)
    }

    pub fn latest(&self) -> Option<&Recording> {
        self.past_recordings.last()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.past_recordings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.past_recordings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recording> {
        self.past_recordings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn recording(name: &str, steps: usize) -> Recording {
        let inputs = (0..steps).map(|i| format!("w {}", i)).collect();
        let outputs = (0..steps).map(|i| format!("out {}", i)).collect();
        Recording::from_parts(name, Utc::now(), inputs, outputs).unwrap()
    }

    #[test]
    fn test_lookup_by_name_and_index() {
        let mut store = RecordingStore::new();
        assert!(store.latest().is_none());
        assert_eq!(store.add(recording("a", 1)), 0);
        assert_eq!(store.add(recording("b", 2)), 1);

        assert_eq!(store.by_name("b").unwrap().len(), 2);
        assert_eq!(store.by_index(0).unwrap().name(), "a");
        assert_eq!(store.latest().unwrap().name(), "b");
        assert!(store.by_name("c").is_none());
    }

    #[test]
    fn test_reused_name_points_at_newest() {
        let mut store = RecordingStore::new();
        store.add(recording("demo", 1));
        store.add(recording("demo", 3));

        assert_eq!(store.len(), 2);
        assert_eq!(store.by_name("demo").unwrap().len(), 3);
        assert_eq!(store.by_index(0).unwrap().len(), 1);
        assert_eq!(store.index_of("demo"), Some(1));
    }
}
