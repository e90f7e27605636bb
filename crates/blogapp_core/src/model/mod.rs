//! Domain model for blog posts and their comments.
//!
//! # Responsibility
//! - Define the canonical records and the drafts callers submit.
//! - Keep the per-entity rules (validation, patchable fields, filters) next
//!   to the data they govern.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `RecordId`.
//! - Comments reference posts softly; no existence check is performed.

pub mod blog_post;
pub mod comment;
pub mod record;
