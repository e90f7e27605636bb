//! `/comments` handlers.
//!
//! Comments are only listed per post (`?blog_post_id=N`); the referenced post
//! is never looked up.

use super::{json_body, parse_id, with_service};
use crate::error::{ApiError, ApiResult};
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use blogapp_core::{BlogService, Comment, CommentDraft, RecordId};
use serde::Deserialize;

const ENTITY: &str = "comment";

#[derive(Debug, Default, Deserialize)]
pub struct CommentListParams {
    pub blog_post_id: Option<String>,
}

impl CommentListParams {
    fn blog_post_id(&self) -> Result<RecordId, ApiError> {
        self.blog_post_id
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .ok_or(ApiError::InvalidBlogPostFilter)
    }
}

/// Update bodies only carry `content`.
#[derive(Debug, Deserialize)]
pub struct CommentPatch {
    #[serde(default)]
    pub content: String,
}

pub async fn list_comments(
    State(service): State<BlogService>,
    params: Result<Query<CommentListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Comment>>> {
    let Query(params) = params.map_err(|_| ApiError::InvalidBlogPostFilter)?;
    let blog_post_id = params.blog_post_id()?;
    let comments = with_service(service, move |service| {
        service.list_comments_for_post(blog_post_id)
    })
    .await?;
    Ok(Json(comments))
}

pub async fn get_comment(
    State(service): State<BlogService>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Comment>> {
    let id = parse_id(&raw_id, ENTITY)?;
    let comment = with_service(service, move |service| service.get_comment(id)).await?;
    Ok(Json(comment))
}

pub async fn create_comment(
    State(service): State<BlogService>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let draft: CommentDraft = json_body(&body)?;
    let comment = with_service(service, move |service| service.create_comment(draft)).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update_comment(
    State(service): State<BlogService>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Comment>> {
    let id = parse_id(&raw_id, ENTITY)?;
    let patch = CommentDraft::content_only(json_body::<CommentPatch>(&body)?.content);
    let comment = with_service(service, move |service| service.update_comment(id, patch)).await?;
    Ok(Json(comment))
}

pub async fn delete_comment(
    State(service): State<BlogService>,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&raw_id, ENTITY)?;
    with_service(service, move |service| service.delete_comment(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
