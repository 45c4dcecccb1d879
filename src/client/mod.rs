//! Post API Client
//!
//! A typed HTTP client for the post service. This is the contract a presentation layer
//! relies on: call the endpoints, render what comes back.
//!
//! Transport failures are retried with exponential backoff and jitter. `GET` and `PUT`
//! are retried on any transport error; `POST` and `DELETE` only when the connection
//! could not be established, since a timed-out create or delete may have committed.
//! HTTP error statuses are not retried; `404` is reported as `Ok(None)` and anything
//! else as an error carrying the status.

pub mod client;

pub use client::PostClient;
