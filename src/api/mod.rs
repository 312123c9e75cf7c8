//! REST API client module for the language-learning backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! backend REST API: vocabulary, phrases, grammar, exercises, and the
//! auth endpoints.
//!
//! Requests carry a JWT bearer token; on a 401 the client performs a
//! single-flight refresh-token exchange and retries the request once.

pub mod client;
pub mod error;

pub use client::{ApiClient, RequestOptions};
pub use error::ApiError;
