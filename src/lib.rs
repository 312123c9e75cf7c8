//! Lingocache core - API client, models, cache, and auth for a
//! language-learning client.
//!
//! The centerpiece is [`ApiClient`]: an authenticated HTTP client that
//! attaches bearer credentials, lazily hydrates them from a
//! [`TokenStore`], refreshes them with a single-flight refresh-token
//! exchange when a request comes back 401, and notifies the embedding
//! application exactly once when authentication is irrecoverably lost.
//!
//! Around it sit the conventional pieces of a client core: domain
//! models, a local JSON cache for offline reads, and app configuration.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError, RequestOptions};
pub use auth::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, StoredTokens, TokenPair, TokenStore};
pub use cache::{CacheManager, CachedData};
pub use config::Config;
