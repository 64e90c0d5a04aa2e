// Document store capability: where records live between ingestion and
// aggregation.
//
// The aggregation engine does not care whether filtering happens inside a
// database or after fetching everything; it only needs matching records.
// MemoryStore is the in-process implementation: a RwLock around an ordered
// map, so the trait can take &self the way a connection-backed store would.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use tracing::debug;

use super::models::{DocumentId, DocumentRecord};
use crate::cohort::CohortFilter;

pub trait DocumentStore: Send + Sync {
    /// Add a record and return its new id.
    fn insert(&self, record: DocumentRecord) -> Result<DocumentId>;

    /// Swap the record under `id` for a freshly computed one.
    fn replace(&self, id: DocumentId, record: DocumentRecord) -> Result<()>;

    fn get(&self, id: DocumentId) -> Result<Option<DocumentRecord>>;

    /// All records matching `filter`, in id order.
    fn find(&self, filter: &CohortFilter) -> Result<Vec<DocumentRecord>>;

    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Sorted distinct faculties across all records.
    fn faculties(&self) -> Result<Vec<String>>;

    /// Sorted distinct courses across all records.
    fn courses(&self) -> Result<Vec<u8>>;

    /// Sorted distinct departments across all records.
    fn departments(&self) -> Result<Vec<String>>;
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    records: BTreeMap<DocumentId, DocumentRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `records`, ids assigned in order.
    pub fn from_records(records: impl IntoIterator<Item = DocumentRecord>) -> Result<Self> {
        let store = Self::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| anyhow!("document store lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| anyhow!("document store lock poisoned"))
    }

    fn distinct<T: Ord + Clone>(
        &self,
        field: impl Fn(&DocumentRecord) -> Option<&T>,
    ) -> Result<Vec<T>> {
        let inner = self.read()?;
        let values: BTreeSet<T> = inner.records.values().filter_map(|r| field(r).cloned()).collect();
        Ok(values.into_iter().collect())
    }
}

impl DocumentStore for MemoryStore {
    fn insert(&self, record: DocumentRecord) -> Result<DocumentId> {
        let mut inner = self.write()?;
        let id = DocumentId(inner.next_id);
        inner.next_id += 1;
        debug!(%id, title = %record.metadata.title, "Stored document record");
        inner.records.insert(id, record);
        Ok(id)
    }

    fn replace(&self, id: DocumentId, record: DocumentRecord) -> Result<()> {
        let mut inner = self.write()?;
        match inner.records.get_mut(&id) {
            Some(slot) => {
                *slot = record;
                debug!(%id, "Replaced document record");
                Ok(())
            }
            None => anyhow::bail!("No document with id {id}"),
        }
    }

    fn get(&self, id: DocumentId) -> Result<Option<DocumentRecord>> {
        Ok(self.read()?.records.get(&id).cloned())
    }

    fn find(&self, filter: &CohortFilter) -> Result<Vec<DocumentRecord>> {
        let inner = self.read()?;
        Ok(inner
            .records
            .values()
            .filter(|r| filter.matches(&r.metadata))
            .cloned()
            .collect())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.read()?.records.len())
    }

    fn faculties(&self) -> Result<Vec<String>> {
        self.distinct(|r| r.metadata.faculty.as_ref())
    }

    fn courses(&self) -> Result<Vec<u8>> {
        self.distinct(|r| r.metadata.course.as_ref())
    }

    fn departments(&self) -> Result<Vec<String>> {
        self.distinct(|r| r.metadata.department.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::models::DocumentMetadata;
    use crate::stats::analyze;

    fn record(author: &str, faculty: Option<&str>, course: Option<u8>) -> DocumentRecord {
        let mut metadata = DocumentMetadata::new("t", author);
        metadata.faculty = faculty.map(str::to_string);
        metadata.course = course;
        DocumentRecord {
            metadata,
            stats: analyze(&["x"], 5).unwrap(),
            fingerprint: None,
            raw_chars: 1,
            clean_chars: 1,
        }
    }

    #[test]
    fn test_insert_get_replace() {
        let store = MemoryStore::new();
        let id = store.insert(record("ann", None, None)).unwrap();
        assert_eq!(store.get(id).unwrap().unwrap().metadata.author, "ann");

        store.replace(id, record("bob", None, None)).unwrap();
        assert_eq!(store.get(id).unwrap().unwrap().metadata.author, "bob");
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_replace_unknown_id_fails() {
        let store = MemoryStore::new();
        assert!(store.replace(DocumentId(42), record("x", None, None)).is_err());
    }

    #[test]
    fn test_find_by_filter() {
        let store = MemoryStore::from_records([
            record("ann", Some("fkti"), Some(1)),
            record("bob", Some("fel"), Some(2)),
            record("cid", Some("fkti"), Some(2)),
        ])
        .unwrap();

        let filter = CohortFilter {
            faculty: Some("fkti".into()),
            ..Default::default()
        };
        let found: Vec<String> = store
            .find(&filter)
            .unwrap()
            .into_iter()
            .map(|r| r.metadata.author)
            .collect();
        assert_eq!(found, vec!["ann", "cid"]);
        assert_eq!(store.find(&CohortFilter::default()).unwrap().len(), 3);
    }

    #[test]
    fn test_distinct_values_sorted() {
        let store = MemoryStore::from_records([
            record("a", Some("fkti"), Some(3)),
            record("b", Some("fel"), Some(1)),
            record("c", Some("fkti"), None),
            record("d", None, Some(3)),
        ])
        .unwrap();
        assert_eq!(store.faculties().unwrap(), vec!["fel", "fkti"]);
        assert_eq!(store.courses().unwrap(), vec![1, 3]);
        assert!(store.departments().unwrap().is_empty());
    }
}
