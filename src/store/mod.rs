//! Record Store Module
//!
//! Owns the on-disk JSON document holding every post.
//!
//! ## Core Concepts
//! - **Whole-document I/O**: The collection is read in full on every operation and
//!   written in full on every mutation. There is no in-memory cache between calls.
//! - **Single write primitive**: `replace_all` is the only write. Create, update and
//!   delete are all "load, compute the new collection, replace".
//! - **Serialized mutation**: `PostStore::mutate` holds a per-store lock across the
//!   load-modify-write cycle so concurrent requests cannot lose each other's updates.
//!
//! ## Submodules
//! - **`types`**: The `Post` record and the validated `PostDraft` body.
//! - **`store`**: `PostStore`, the file-backed collection.
//! - **`error`**: `StoreError` for I/O and document format failures.

pub mod error;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use store::PostStore;
pub use types::{Post, PostDraft};

#[cfg(test)]
mod tests;
