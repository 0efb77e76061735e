//! Backing-store contract shared by every catalog store.
//!
//! # Invariants
//! - `find_by_id` reports absence as `Ok(None)`; only the lookup service
//!   turns absence into `RepoError::NotFound`.
//! - `insert` validates the record before any write.

use crate::db::DbError;
use crate::model::{EntityKind, ModelValidationError, Record};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and lookups.
#[derive(Debug)]
pub enum RepoError {
    /// Requested record does not exist.
    NotFound(EntityKind),
    /// A record with the same identifier is already stored.
    AlreadyExists(EntityKind),
    Validation(ModelValidationError),
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted into a record.
    InvalidData(String),
    /// Non-SQLite store failure.
    Backend(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(kind) => write!(f, "{kind} not found"),
            Self::AlreadyExists(kind) => write!(f, "{kind} already exists"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "catalog store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "catalog store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "catalog store requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
            Self::Backend(message) => write!(f, "catalog store failure: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Read-by-id and insert capability of a backing store for one record kind.
pub trait RecordStore<R: Record> {
    /// Loads one record, or `None` when the identifier does not resolve.
    fn find_by_id(&self, id: &R::Id) -> RepoResult<Option<R>>;
    /// Stores a new record. Fails with `AlreadyExists` on duplicate ids.
    fn insert(&self, record: &R) -> RepoResult<()>;
}

impl<R: Record, S: RecordStore<R> + ?Sized> RecordStore<R> for &S {
    fn find_by_id(&self, id: &R::Id) -> RepoResult<Option<R>> {
        (**self).find_by_id(id)
    }

    fn insert(&self, record: &R) -> RepoResult<()> {
        (**self).insert(record)
    }
}
