//! Comment domain model.
//!
//! # Invariants
//! - `blog_post_id` is a soft reference: it must be positive at create time
//!   but is never checked against existing posts.
//! - `blog_post_id` is fixed at create; updates replace `content` only.

use super::record::{refreshed_updated_at, Record, RecordId, TimestampMs, ValidationError};
use serde::{Deserialize, Serialize};

/// Persisted comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: RecordId,
    pub blog_post_id: RecordId,
    pub content: String,
    pub created_at: TimestampMs,
    pub updated_at: TimestampMs,
}

/// Caller-supplied comment fields.
///
/// `blog_post_id` decodes to `0` when absent, which create rejects and update
/// ignores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDraft {
    #[serde(default)]
    pub blog_post_id: RecordId,
    #[serde(default)]
    pub content: String,
}

impl CommentDraft {
    pub fn new(blog_post_id: RecordId, content: impl Into<String>) -> Self {
        Self {
            blog_post_id,
            content: content.into(),
        }
    }

    /// Patch shape for updates, which never move a comment between posts.
    pub fn content_only(content: impl Into<String>) -> Self {
        Self {
            blog_post_id: 0,
            content: content.into(),
        }
    }
}

/// Selects comments attached to one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentFilter {
    pub blog_post_id: RecordId,
}

impl CommentFilter {
    pub fn for_post(blog_post_id: RecordId) -> Self {
        Self { blog_post_id }
    }
}

impl Record for Comment {
    type Draft = CommentDraft;
    type Filter = CommentFilter;

    const KIND: &'static str = "comment";

    fn id(&self) -> RecordId {
        self.id
    }

    fn created_at(&self) -> TimestampMs {
        self.created_at
    }

    fn updated_at(&self) -> TimestampMs {
        self.updated_at
    }

    fn validate_draft(draft: &CommentDraft) -> Result<(), ValidationError> {
        match draft.blog_post_id {
            0 => Err(ValidationError::MissingField("blog_post_id")),
            id if id < 0 => Err(ValidationError::InvalidField {
                field: "blog_post_id",
                message: format!("must be positive, got {id}"),
            }),
            _ => Ok(()),
        }
    }

    fn from_draft(id: RecordId, draft: CommentDraft, now: TimestampMs) -> Self {
        Self {
            id,
            blog_post_id: draft.blog_post_id,
            content: draft.content,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: CommentDraft, now: TimestampMs) {
        self.content = patch.content;
        self.updated_at = refreshed_updated_at(self.updated_at, now);
    }

    fn matches(&self, filter: &CommentFilter) -> bool {
        self.blog_post_id == filter.blog_post_id
    }
}
