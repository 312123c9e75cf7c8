//! Authentication module for managing the stored token pair.
//!
//! This module provides:
//! - `TokenPair` / `StoredTokens`: the access/refresh credential pair
//! - `TokenStore`: persistent storage trait with batched read/write
//! - `FileTokenStore`, `KeyringTokenStore`, `MemoryTokenStore` backends
//!
//! Token refresh itself lives in the API client; this module only owns
//! how the pair is persisted between app launches.

pub mod store;
pub mod tokens;

pub use store::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};
pub use tokens::{StoredTokens, TokenPair};
