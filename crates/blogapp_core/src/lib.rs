//! Core record stores for the blog service.
//! This crate is the single source of truth for record identity, timestamps
//! and per-store serialization.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::blog_post::{BlogPost, BlogPostDraft};
pub use model::comment::{Comment, CommentDraft, CommentFilter};
pub use model::record::{Record, RecordId, TimestampMs, ValidationError};
pub use repo::memory_repo::InMemoryRepository;
pub use repo::record_repo::{ErrorKind, RecordRepository, RepoError, RepoResult};
pub use repo::sqlite_repo::{SharedConnection, SqlRecord, SqliteRepository};
pub use service::blog_service::{BlogService, CommentStore, PostStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
