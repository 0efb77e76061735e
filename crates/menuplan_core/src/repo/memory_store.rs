//! In-memory record store.
//!
//! Holds one record kind in a mutex-guarded ordered map. Used as a scratch
//! store and as the store behind lookup tests that need no SQLite schema.

use crate::model::Record;
use crate::repo::record_store::{RecordStore, RepoError, RepoResult};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

pub struct MemoryStore<R: Record> {
    records: Mutex<BTreeMap<R::Id, R>>,
}

impl<R: Record> MemoryStore<R>
where
    R::Id: Ord,
{
    pub fn new() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> RepoResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> RepoResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, BTreeMap<R::Id, R>>> {
        self.records
            .lock()
            .map_err(|_| RepoError::Backend("memory store mutex poisoned".to_string()))
    }
}

impl<R: Record> Default for MemoryStore<R>
where
    R::Id: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R> RecordStore<R> for MemoryStore<R>
where
    R: Record + Clone,
    R::Id: Ord + Clone,
{
    fn find_by_id(&self, id: &R::Id) -> RepoResult<Option<R>> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn insert(&self, record: &R) -> RepoResult<()> {
        record.validate()?;

        let mut records = self.lock()?;
        if records.contains_key(record.record_id()) {
            return Err(RepoError::AlreadyExists(R::KIND));
        }
        records.insert(record.record_id().clone(), record.clone());
        Ok(())
    }
}
