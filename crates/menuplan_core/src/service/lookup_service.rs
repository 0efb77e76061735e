//! Lookup use-case service.
//!
//! # Responsibility
//! - Resolve exactly one record by identifier through a backing store.
//! - Turn absence into an explicit `RepoError::NotFound(kind)`.
//!
//! # Invariants
//! - Reads only; never creates, mutates or caches records.
//! - Store errors are returned unchanged, with no retries.

use crate::model::recipe::Recipe;
use crate::model::Record;
use crate::repo::record_store::{RecordStore, RepoError, RepoResult};
use log::{debug, warn};
use std::marker::PhantomData;

/// Find-by-id service over one record kind.
pub struct LookupService<R, S> {
    store: S,
    _record: PhantomData<fn() -> R>,
}

/// Recipe lookups, failing with "Recipe not found".
pub type RecipesRepository<S> = LookupService<Recipe, S>;

impl<R: Record, S: RecordStore<R>> LookupService<R, S> {
    /// Creates a service over the provided store (owned or borrowed).
    pub fn new(store: S) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// Returns the record stored under `id`.
    ///
    /// # Errors
    /// - `RepoError::NotFound(R::KIND)` when the store has no such record,
    ///   including ids the store cannot resolve at all.
    /// - Any store error, unchanged.
    pub fn find(&self, id: &R::Id) -> RepoResult<R> {
        match self.store.find_by_id(id) {
            Ok(Some(record)) => {
                debug!("event=record_find module=service kind={} status=ok", R::KIND);
                Ok(record)
            }
            Ok(None) => {
                debug!(
                    "event=record_find module=service kind={} status=not_found",
                    R::KIND
                );
                Err(RepoError::NotFound(R::KIND))
            }
            Err(err) => {
                warn!(
                    "event=record_find module=service kind={} status=error error={}",
                    R::KIND,
                    err
                );
                Err(err)
            }
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
