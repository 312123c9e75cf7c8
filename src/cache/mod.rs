//! Local caching module for offline data access.
//!
//! This module provides the `CacheManager` for storing and retrieving
//! fetched API data locally. Data is cached in JSON format and considered
//! stale after 60 minutes.
//!
//! Cached data types include:
//! - Vocabulary and phrases
//! - Grammar topics and their exercises
//! - The user profile

pub mod manager;

pub use manager::{CacheManager, CachedData};
