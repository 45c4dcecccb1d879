//! Post API Protocol
//!
//! Defines the HTTP endpoints and the request body accepted by the write operations.
//!
//! Bodies arrive as untyped JSON. `PostPayload::validate` is the single validation step
//! that turns such a value into a `PostDraft` or rejects it outright; a handler never
//! sees a partially populated body.

use super::error::ApiError;
use crate::store::types::PostDraft;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- API Endpoints ---

/// Collection resource: list (`GET`) and create (`POST`).
pub const ENDPOINT_POSTS: &str = "/post";
/// Item resource: fetch (`GET`), update (`PUT`) and delete (`DELETE`) by id.
pub const ENDPOINT_POST_ITEM: &str = "/post/:id";

// --- Data Transfer Objects ---

/// Body of `POST /post` and `PUT /post/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostPayload {
    pub heading: String,
    pub content: String,
}

/// Stable body returned alongside storage failures.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl PostPayload {
    /// Validates an untyped request body.
    ///
    /// Both `heading` and `content` must be present and be non-empty strings.
    pub fn validate(body: &Value) -> Result<PostDraft, ApiError> {
        if !body.is_object() {
            return Err(ApiError::Validation(
                "request body must be a JSON object".to_string(),
            ));
        }

        Ok(PostDraft::new(
            required_text(body, "heading")?,
            required_text(body, "content")?,
        ))
    }
}

fn required_text(body: &Value, field: &str) -> Result<String, ApiError> {
    match body.get(field) {
        Some(Value::String(text)) if !text.is_empty() => Ok(text.clone()),
        Some(Value::String(_)) => Err(ApiError::Validation(format!("`{}` is empty", field))),
        Some(Value::Null) | None => Err(ApiError::Validation(format!("`{}` is missing", field))),
        Some(_) => Err(ApiError::Validation(format!(
            "`{}` must be a string",
            field
        ))),
    }
}

/// Parses the `{id}` path segment as a positive base-10 integer.
pub fn parse_post_id(raw: &str) -> Result<u64, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::Validation(format!("invalid post id `{}`", raw)));
    }

    match raw.parse::<u64>() {
        Ok(0) | Err(_) => Err(ApiError::Validation(format!("invalid post id `{}`", raw))),
        Ok(id) => Ok(id),
    }
}
