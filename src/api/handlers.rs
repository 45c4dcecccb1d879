use super::error::ApiError;
use super::protocol::{PostPayload, parse_post_id};
use crate::store::store::PostStore;
use crate::store::types::{Post, PostDraft};

use axum::extract::Path;
use axum::extract::rejection::JsonRejection;
use axum::http::{Method, StatusCode};
use axum::{Extension, Json};
use serde_json::Value;
use std::sync::Arc;

type JsonBody = Result<Json<Value>, JsonRejection>;

// --- Collection resource ---

pub async fn handle_list_posts(
    Extension(store): Extension<Arc<PostStore>>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = store.list().await?;
    tracing::debug!("Listing {} posts", posts.len());
    Ok(Json(posts))
}

pub async fn handle_create_post(
    Extension(store): Extension<Arc<PostStore>>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let draft = parse_body(body)?;
    let post = store.create(draft).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

// --- Item resource ---

pub async fn handle_get_post(
    Extension(store): Extension<Arc<PostStore>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let id = parse_post_id(&raw_id)?;

    match store.get(id).await? {
        Some(post) => Ok(Json(post)),
        None => Err(ApiError::NotFound(id)),
    }
}

pub async fn handle_update_post(
    Extension(store): Extension<Arc<PostStore>>,
    Path(raw_id): Path<String>,
    body: JsonBody,
) -> Result<Json<Post>, ApiError> {
    let id = parse_post_id(&raw_id)?;
    let draft = parse_body(body)?;

    match store.update(id, draft).await? {
        Some(post) => Ok(Json(post)),
        None => Err(ApiError::NotFound(id)),
    }
}

pub async fn handle_delete_post(
    Extension(store): Extension<Arc<PostStore>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let id = parse_post_id(&raw_id)?;

    match store.delete(id).await? {
        Some(remaining) => Ok(Json(remaining)),
        None => Err(ApiError::NotFound(id)),
    }
}

/// Default branch of both method tables.
pub async fn handle_method_not_allowed(method: Method) -> ApiError {
    tracing::warn!("Unsupported method {} on post resource", method);
    ApiError::MethodNotAllowed
}

fn parse_body(body: JsonBody) -> Result<PostDraft, ApiError> {
    let Json(value) = body.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    PostPayload::validate(&value)
}
