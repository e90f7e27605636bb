//! Blog post domain model.
//!
//! # Invariants
//! - `title` and `content` are the only fields an update may replace.
//! - Posts carry no secondary key, so their list filter is `()`.

use super::record::{refreshed_updated_at, Record, RecordId, TimestampMs, ValidationError};
use serde::{Deserialize, Serialize};

/// Persisted blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    pub created_at: TimestampMs,
    pub updated_at: TimestampMs,
}

/// Caller-supplied post fields for create and update.
///
/// Missing JSON fields decode to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPostDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl BlogPostDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

impl Record for BlogPost {
    type Draft = BlogPostDraft;
    type Filter = ();

    const KIND: &'static str = "blog post";

    fn id(&self) -> RecordId {
        self.id
    }

    fn created_at(&self) -> TimestampMs {
        self.created_at
    }

    fn updated_at(&self) -> TimestampMs {
        self.updated_at
    }

    fn validate_draft(_draft: &BlogPostDraft) -> Result<(), ValidationError> {
        Ok(())
    }

    fn from_draft(id: RecordId, draft: BlogPostDraft, now: TimestampMs) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: BlogPostDraft, now: TimestampMs) {
        self.title = patch.title;
        self.content = patch.content;
        self.updated_at = refreshed_updated_at(self.updated_at, now);
    }

    fn matches(&self, _filter: &()) -> bool {
        true
    }
}
