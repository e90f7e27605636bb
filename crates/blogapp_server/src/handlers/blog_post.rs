//! `/blog_posts` handlers.

use super::{json_body, parse_id, with_service};
use crate::error::ApiResult;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use blogapp_core::{BlogPost, BlogPostDraft, BlogService};

const ENTITY: &str = "blog post";

pub async fn list_blog_posts(State(service): State<BlogService>) -> ApiResult<Json<Vec<BlogPost>>> {
    let posts = with_service(service, |service| service.list_posts()).await?;
    Ok(Json(posts))
}

pub async fn get_blog_post(
    State(service): State<BlogService>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<BlogPost>> {
    let id = parse_id(&raw_id, ENTITY)?;
    let post = with_service(service, move |service| service.get_post(id)).await?;
    Ok(Json(post))
}

pub async fn create_blog_post(
    State(service): State<BlogService>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<BlogPost>)> {
    let draft: BlogPostDraft = json_body(&body)?;
    let post = with_service(service, move |service| service.create_post(draft)).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_blog_post(
    State(service): State<BlogService>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<BlogPost>> {
    let id = parse_id(&raw_id, ENTITY)?;
    let patch: BlogPostDraft = json_body(&body)?;
    let post = with_service(service, move |service| service.update_post(id, patch)).await?;
    Ok(Json(post))
}

pub async fn delete_blog_post(
    State(service): State<BlogService>,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&raw_id, ENTITY)?;
    with_service(service, move |service| service.delete_post(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
