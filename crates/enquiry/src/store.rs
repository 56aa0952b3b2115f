//! In-memory record store.
//!
//! Holds the committed entries in submission order. The store enforces the
//! required-field invariant on every write; callers report user-facing
//! outcomes themselves.

use tracing::debug;

use crate::entry::Entry;
use crate::error::{Error, Result, ValidationError};

/// Ordered collection of committed entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    entries: Vec<Entry>,
}

impl RecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// All entries in order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Iterate entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Append an entry, returning its index.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IncompleteForm`] if a required field is empty.
    pub fn append(&mut self, entry: Entry) -> Result<usize> {
        ensure_complete(&entry)?;
        self.entries.push(entry);
        let index = self.entries.len() - 1;
        debug!(index, "Appended entry");
        Ok(index)
    }

    /// Replace the entry at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchEntry`] for an out-of-range index, or
    /// [`ValidationError::IncompleteForm`] if a required field is empty.
    pub fn replace(&mut self, index: usize, entry: Entry) -> Result<Entry> {
        let len = self.entries.len();
        let slot = self
            .entries
            .get_mut(index)
            .ok_or(Error::NoSuchEntry { index, len })?;
        ensure_complete(&entry)?;
        debug!(index, "Replaced entry");
        Ok(std::mem::replace(slot, entry))
    }

    /// Remove the entry at `index`, keeping the order of the rest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchEntry`] for an out-of-range index.
    pub fn remove(&mut self, index: usize) -> Result<Entry> {
        if index >= self.entries.len() {
            return Err(Error::NoSuchEntry {
                index,
                len: self.entries.len(),
            });
        }
        debug!(index, "Removed entry");
        Ok(self.entries.remove(index))
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn ensure_complete(entry: &Entry) -> Result<()> {
    if entry.is_complete() {
        Ok(())
    } else {
        Err(ValidationError::IncompleteForm.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> Entry {
        Entry {
            username: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone_number: "555".to_string(),
            gender: "F".to_string(),
            ..Entry::default()
        }
    }

    fn names(store: &RecordStore) -> Vec<&str> {
        store.iter().map(|e| e.username.as_str()).collect()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = RecordStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.get(0).is_none());
    }

    #[test]
    fn test_append_returns_index() {
        let mut store = RecordStore::new();
        assert_eq!(store.append(entry("Ann")).unwrap(), 0);
        assert_eq!(store.append(entry("Bo")).unwrap(), 1);
        assert_eq!(names(&store), vec!["Ann", "Bo"]);
    }

    #[test]
    fn test_append_rejects_incomplete() {
        let mut store = RecordStore::new();
        let mut e = entry("Ann");
        e.phone_number.clear();

        let err = store.append(e).unwrap_err();
        assert_eq!(err.as_validation(), Some(ValidationError::IncompleteForm));
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace() {
        let mut store = RecordStore::new();
        store.append(entry("Ann")).unwrap();
        store.append(entry("Bo")).unwrap();

        let old = store.replace(1, entry("Cy")).unwrap();
        assert_eq!(old.username, "Bo");
        assert_eq!(names(&store), vec!["Ann", "Cy"]);
    }

    #[test]
    fn test_replace_out_of_range() {
        let mut store = RecordStore::new();
        store.append(entry("Ann")).unwrap();

        let err = store.replace(3, entry("Cy")).unwrap_err();
        assert!(matches!(err, Error::NoSuchEntry { index: 3, len: 1 }));
        assert_eq!(names(&store), vec!["Ann"]);
    }

    #[test]
    fn test_replace_rejects_incomplete() {
        let mut store = RecordStore::new();
        store.append(entry("Ann")).unwrap();

        let err = store.replace(0, Entry::default()).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(names(&store), vec!["Ann"]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut store = RecordStore::new();
        for name in ["Ann", "Bo", "Cy", "Di"] {
            store.append(entry(name)).unwrap();
        }

        let removed = store.remove(1).unwrap();
        assert_eq!(removed.username, "Bo");
        assert_eq!(store.len(), 3);
        assert_eq!(names(&store), vec!["Ann", "Cy", "Di"]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut store = RecordStore::new();
        let err = store.remove(0).unwrap_err();
        assert!(matches!(err, Error::NoSuchEntry { index: 0, len: 0 }));
    }

    #[test]
    fn test_into_iterator() {
        let mut store = RecordStore::new();
        store.append(entry("Ann")).unwrap();
        let mut count = 0;
        for e in &store {
            assert_eq!(e.username, "Ann");
            count += 1;
        }
        assert_eq!(count, 1);
    }
}
