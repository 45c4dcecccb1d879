//! Record Data Types
//!
//! The persisted document is a JSON array of `Post` objects, verbatim.
//! There is no envelope and no schema version field.

use serde::{Deserialize, Serialize};

/// A single stored record.
///
/// `id` is assigned by the store when the post is created and never changes
/// afterwards. Only `heading` and `content` are mutable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub heading: String,
    pub content: String,
}

/// A validated record body that has not been assigned an identifier yet.
///
/// Built by the request validator, consumed by `create` and `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub heading: String,
    pub content: String,
}

impl PostDraft {
    pub fn new(heading: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            content: content.into(),
        }
    }

    /// Turns the draft into a stored record under `id`.
    pub fn into_post(self, id: u64) -> Post {
        Post {
            id,
            heading: self.heading,
            content: self.content,
        }
    }
}

impl Post {
    /// Overwrites the mutable fields, keeping `id`.
    pub fn apply(&mut self, draft: PostDraft) {
        self.heading = draft.heading;
        self.content = draft.content;
    }
}
