//! Record store abstraction and its backends.
//!
//! # Responsibility
//! - Define the CRUD contract handlers depend on (`RecordRepository`).
//! - Provide the in-memory and SQLite implementations of that contract.
//!
//! # Invariants
//! - Repository writes validate drafts before any mutation.
//! - Every backend reports the same semantic errors (`InvalidInput`,
//!   `NotFound`) plus `StorageUnavailable` for storage failures.

pub mod memory_repo;
pub mod record_repo;
pub mod sqlite_repo;
