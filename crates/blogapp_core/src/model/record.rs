//! Shared record contract implemented by every stored entity.
//!
//! # Responsibility
//! - Describe how an entity is built from a caller-supplied draft.
//! - Describe which fields a patch may replace and how filters match.
//!
//! # Invariants
//! - `id` and `created_at` are assigned once by a store and never change.
//! - Every update moves `updated_at` strictly forward; it never precedes
//!   `created_at`.
//! - Drafts never carry identity or timestamps.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Store-assigned record identity.
pub type RecordId = i64;

/// Unix epoch milliseconds.
pub type TimestampMs = i64;

/// Draft validation failure. Never produced after a mutation started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent or zero.
    MissingField(&'static str),
    /// A field is present but out of its allowed domain.
    InvalidField {
        field: &'static str,
        message: String,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidField { field, message } => write!(f, "invalid {field}: {message}"),
        }
    }
}

impl Error for ValidationError {}

/// Entity stored by a [`crate::RecordRepository`].
///
/// Implementors are plain data; stores own identity, timestamps and locking.
pub trait Record: Debug + Clone + Serialize + Send + Sync + 'static {
    /// Candidate payload for create, also used as the update patch.
    type Draft: Debug + Clone + DeserializeOwned + Send + Sync;
    /// Field filter accepted by `list_where`.
    type Filter: Debug + Send + Sync;

    /// Human-readable entity name used in error messages.
    const KIND: &'static str;

    fn id(&self) -> RecordId;
    fn created_at(&self) -> TimestampMs;
    fn updated_at(&self) -> TimestampMs;

    /// Checks required fields of a create candidate.
    fn validate_draft(draft: &Self::Draft) -> Result<(), ValidationError>;

    /// Builds the persisted shape of a freshly created record.
    fn from_draft(id: RecordId, draft: Self::Draft, now: TimestampMs) -> Self;

    /// Replaces mutable content fields and refreshes `updated_at`.
    ///
    /// `updated_at` is `max(now, previous + 1)`: an update in the same
    /// millisecond as the last write, or after a clock step backwards, still
    /// advances it.
    fn apply_patch(&mut self, patch: Self::Draft, now: TimestampMs);

    fn matches(&self, filter: &Self::Filter) -> bool;
}

pub(crate) fn refreshed_updated_at(previous: TimestampMs, now: TimestampMs) -> TimestampMs {
    now.max(previous.saturating_add(1))
}
