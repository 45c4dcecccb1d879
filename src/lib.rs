//! Post Record Service Library
//!
//! This library crate defines the modules behind the post service binary (`main.rs`).
//!
//! ## Architecture Modules
//! The service is split into four small subsystems:
//!
//! - **`store`**: The record store. Owns a single JSON document on disk holding every post,
//!   exposes whole-collection `load_all`/`replace_all`, and serializes load-modify-write
//!   cycles through one mutation entry point.
//! - **`api`**: The request router. Maps `/post` and `/post/{id}` onto store operations,
//!   validates identifiers and bodies, and turns outcomes into HTTP status codes.
//! - **`client`**: A typed HTTP client for the same surface, with retry on transport errors.
//! - **`config`**: Command-line and environment configuration for the binary.

pub mod api;
pub mod client;
pub mod config;
pub mod store;
