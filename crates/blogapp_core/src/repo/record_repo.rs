//! Record store contract shared by every backend.
//!
//! # Responsibility
//! - Define the CRUD capability the HTTP layer depends on.
//! - Define the error taxonomy reported by every backend.
//!
//! # Invariants
//! - Each operation is serialized against all others on the same store.
//! - `InvalidInput` and `NotFound` never mutate store state.
//! - Ids are never reused, including after delete.

use crate::db::DbError;
use crate::model::record::{Record, RecordId, ValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Coarse failure classification for callers that map errors to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    StorageUnavailable,
}

/// Record store error.
#[derive(Debug)]
pub enum RepoError {
    /// Candidate record failed required-field validation.
    InvalidInput(ValidationError),
    /// No live record with this id.
    NotFound { kind: &'static str, id: RecordId },
    /// Backing storage failed; never retried by the store.
    StorageUnavailable(DbError),
    /// Persisted row violates model invariants.
    InvalidData(String),
}

impl RepoError {
    pub fn not_found<R: Record>(id: RecordId) -> Self {
        Self::NotFound { kind: R::KIND, id }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::StorageUnavailable(_) | Self::InvalidData(_) => ErrorKind::StorageUnavailable,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::StorageUnavailable(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::StorageUnavailable(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::StorageUnavailable(DbError::Sqlite(value))
    }
}

/// Authoritative, concurrency-safe keeper of one entity type's records.
pub trait RecordRepository<R: Record>: Send + Sync {
    /// Returns a snapshot of every live record in insertion order.
    fn list_all(&self) -> RepoResult<Vec<R>>;

    /// Returns live records matching `filter`, in insertion order.
    fn list_where(&self, filter: &R::Filter) -> RepoResult<Vec<R>>;

    fn get(&self, id: RecordId) -> RepoResult<R>;

    /// Validates `draft`, assigns a fresh id and timestamps, and persists it.
    fn create(&self, draft: R::Draft) -> RepoResult<R>;

    /// Replaces the mutable fields of record `id` and refreshes `updated_at`.
    fn update(&self, id: RecordId, patch: R::Draft) -> RepoResult<R>;

    fn delete(&self, id: RecordId) -> RepoResult<()>;
}
