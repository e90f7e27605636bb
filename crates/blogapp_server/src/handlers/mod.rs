//! Request handlers.
//!
//! # Responsibility
//! - Parse path, query and body inputs and call `BlogService`.
//! - Keep no state across requests; the service owns all records.
//!
//! # Invariants
//! - Store calls run on the blocking pool so SQLite I/O never stalls the
//!   async workers.

pub mod blog_post;
pub mod comment;
pub mod health;

use crate::error::{ApiError, ApiResult};
use blogapp_core::{BlogService, RecordId, RepoResult};
use serde::de::DeserializeOwned;

/// Parses a path segment as a record id.
pub(crate) fn parse_id(raw: &str, entity: &'static str) -> ApiResult<RecordId> {
    raw.trim()
        .parse::<RecordId>()
        .map_err(|_| ApiError::InvalidId(entity))
}

/// Decodes a JSON body whatever its `Content-Type`; decode failures are 400.
pub(crate) fn json_body<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|err| ApiError::InvalidBody(err.to_string()))
}

/// Runs one store operation on the blocking pool.
pub(crate) async fn with_service<T, F>(service: BlogService, op: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&BlogService) -> RepoResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&service))
        .await
        .map_err(|err| ApiError::Task(err.to_string()))?
        .map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::parse_id;
    use crate::error::ApiError;

    #[test]
    fn parse_id_accepts_integers_and_rejects_text() {
        assert_eq!(parse_id("42", "comment").unwrap(), 42);
        assert!(matches!(
            parse_id("abc", "comment"),
            Err(ApiError::InvalidId("comment"))
        ));
        assert!(parse_id("1.5", "blog post").is_err());
    }
}
