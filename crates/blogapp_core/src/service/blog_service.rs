//! Blog use-case service.
//!
//! # Responsibility
//! - Bundle the post and comment stores behind one handle for callers.
//! - Select the backend once, at construction.
//!
//! # Invariants
//! - Both stores always come from the same backend.
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Comment creation does not check that the referenced post exists.

use crate::clock::Clock;
use crate::model::blog_post::{BlogPost, BlogPostDraft};
use crate::model::comment::{Comment, CommentDraft, CommentFilter};
use crate::model::record::RecordId;
use crate::repo::memory_repo::InMemoryRepository;
use crate::repo::record_repo::{RecordRepository, RepoResult};
use crate::repo::sqlite_repo::{SharedConnection, SqliteRepository};
use std::sync::Arc;

/// Post store trait object.
pub type PostStore = Arc<dyn RecordRepository<BlogPost>>;
/// Comment store trait object.
pub type CommentStore = Arc<dyn RecordRepository<Comment>>;

/// Cloneable handle over one post store and one comment store.
#[derive(Clone)]
pub struct BlogService {
    backend: &'static str,
    posts: PostStore,
    comments: CommentStore,
}

impl BlogService {
    /// Wraps caller-provided stores, e.g. test doubles.
    pub fn new(backend: &'static str, posts: PostStore, comments: CommentStore) -> Self {
        Self {
            backend,
            posts,
            comments,
        }
    }

    /// Creates a service backed by lock-guarded in-memory stores.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::new(
            "memory",
            Arc::new(InMemoryRepository::<BlogPost>::new(Arc::clone(&clock))),
            Arc::new(InMemoryRepository::<Comment>::new(clock)),
        )
    }

    /// Creates a service backed by a migrated SQLite connection.
    pub fn sqlite(conn: SharedConnection, clock: Arc<dyn Clock>) -> RepoResult<Self> {
        let posts = SqliteRepository::<BlogPost>::try_new(Arc::clone(&conn), Arc::clone(&clock))?;
        let comments = SqliteRepository::<Comment>::try_new(conn, clock)?;
        Ok(Self::new("sqlite", Arc::new(posts), Arc::new(comments)))
    }

    /// Name of the backend chosen at construction.
    pub fn backend_name(&self) -> &'static str {
        self.backend
    }

    pub fn list_posts(&self) -> RepoResult<Vec<BlogPost>> {
        self.posts.list_all()
    }

    pub fn get_post(&self, id: RecordId) -> RepoResult<BlogPost> {
        self.posts.get(id)
    }

    pub fn create_post(&self, draft: BlogPostDraft) -> RepoResult<BlogPost> {
        self.posts.create(draft)
    }

    /// Replaces title and content of an existing post.
    pub fn update_post(&self, id: RecordId, patch: BlogPostDraft) -> RepoResult<BlogPost> {
        self.posts.update(id, patch)
    }

    /// Deletes a post. Its comments are left in place (soft reference).
    pub fn delete_post(&self, id: RecordId) -> RepoResult<()> {
        self.posts.delete(id)
    }

    /// Lists comments attached to `blog_post_id`, oldest first.
    pub fn list_comments_for_post(&self, blog_post_id: RecordId) -> RepoResult<Vec<Comment>> {
        self.comments.list_where(&CommentFilter::for_post(blog_post_id))
    }

    pub fn get_comment(&self, id: RecordId) -> RepoResult<Comment> {
        self.comments.get(id)
    }

    pub fn create_comment(&self, draft: CommentDraft) -> RepoResult<Comment> {
        self.comments.create(draft)
    }

    /// Replaces comment content; `patch.blog_post_id` is ignored.
    pub fn update_comment(&self, id: RecordId, patch: CommentDraft) -> RepoResult<Comment> {
        self.comments.update(id, patch)
    }

    pub fn delete_comment(&self, id: RecordId) -> RepoResult<()> {
        self.comments.delete(id)
    }
}
