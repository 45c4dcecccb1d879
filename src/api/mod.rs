//! Request Router Module
//!
//! Maps the HTTP surface onto `PostStore` operations and status codes.
//!
//! ## Resources
//! - **Collection** (`/post`): `GET` lists every post newest first, `POST` creates one.
//! - **Item** (`/post/{id}`): `GET`, `PUT` and `DELETE` on a single post.
//!
//! Each resource has an explicit method table whose default branch answers `405`.
//! `HEAD` is routed to that branch too instead of falling through to `GET`.
//! Within a handler, checks run in a fixed order and the first failure wins:
//! id shape, then body fields, then existence, then the mutation itself.
//!
//! ## Submodules
//! - **`handlers`**: One Axum handler per (resource, method) pair.
//! - **`protocol`**: Endpoint paths, the request payload and its validator.
//! - **`error`**: `ApiError` and its mapping onto HTTP responses.

pub mod error;
pub mod handlers;
pub mod protocol;

use crate::store::store::PostStore;
use handlers::*;
use protocol::{ENDPOINT_POST_ITEM, ENDPOINT_POSTS};

use axum::routing::get;
use axum::{Extension, Router};
use std::sync::Arc;

/// Builds the post API mounted under `base_path` (e.g. `""` or `"/api"`).
pub fn router(store: Arc<PostStore>, base_path: &str) -> Router {
    let base = normalize_base_path(base_path);

    Router::new()
        .route(
            &format!("{}{}", base, ENDPOINT_POSTS),
            get(handle_list_posts)
                .post(handle_create_post)
                .head(handle_method_not_allowed)
                .fallback(handle_method_not_allowed),
        )
        .route(
            &format!("{}{}", base, ENDPOINT_POST_ITEM),
            get(handle_get_post)
                .put(handle_update_post)
                .delete(handle_delete_post)
                .head(handle_method_not_allowed)
                .fallback(handle_method_not_allowed),
        )
        .layer(Extension(store))
}

/// Normalizes a mount prefix to either `""` or `/segment[/segment...]` without a
/// trailing slash.
pub fn normalize_base_path(base_path: &str) -> String {
    let cleaned = base_path.trim().trim_end_matches('/');
    if cleaned.is_empty() {
        String::new()
    } else if cleaned.starts_with('/') {
        cleaned.to_string()
    } else {
        format!("/{}", cleaned)
    }
}
