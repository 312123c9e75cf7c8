// Allow dead code: Infrastructure methods for future use
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{Exercise, GrammarTopic, Phrase, UserProfile, VocabularyItem};

/// Consider cache stale after 1 hour.
/// Lesson content changes rarely; an hour keeps offline reads useful
/// without hiding fresh material for long.
const CACHE_STALE_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }

    /// Compact age string for display, e.g. "5m ago"
    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew (negative ages)
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

/// Local JSON cache of fetched API data for offline access.
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)?;
        Ok(())
    }

    // ===== Vocabulary =====

    pub fn load_vocabulary(&self) -> Result<Option<CachedData<Vec<VocabularyItem>>>> {
        self.load("vocabulary")
    }

    pub fn save_vocabulary(&self, items: &[VocabularyItem]) -> Result<()> {
        self.save("vocabulary", &items)
    }

    // ===== Phrases =====

    pub fn load_phrases(&self) -> Result<Option<CachedData<Vec<Phrase>>>> {
        self.load("phrases")
    }

    pub fn save_phrases(&self, phrases: &[Phrase]) -> Result<()> {
        self.save("phrases", &phrases)
    }

    // ===== Grammar Topics =====

    pub fn load_grammar_topics(&self) -> Result<Option<CachedData<Vec<GrammarTopic>>>> {
        self.load("grammar_topics")
    }

    pub fn save_grammar_topics(&self, topics: &[GrammarTopic]) -> Result<()> {
        self.save("grammar_topics", &topics)
    }

    // ===== Exercises =====

    pub fn load_exercises(&self, topic_id: i64) -> Result<Option<CachedData<Vec<Exercise>>>> {
        self.load(&format!("exercises_{}", topic_id))
    }

    pub fn save_exercises(&self, topic_id: i64, exercises: &[Exercise]) -> Result<()> {
        self.save(&format!("exercises_{}", topic_id), &exercises)
    }

    // ===== Profile =====

    pub fn load_profile(&self) -> Result<Option<CachedData<UserProfile>>> {
        self.load("profile")
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.save("profile", profile)
    }

    // ===== Staleness =====

    /// Helper to check staleness and log errors without failing
    fn is_cache_stale<T>(
        &self,
        name: &str,
        loader: impl FnOnce() -> Result<Option<CachedData<T>>>,
    ) -> bool {
        match loader() {
            Ok(Some(cached)) => cached.is_stale(),
            Ok(None) => true, // No cache = stale
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for staleness check");
                true // Error reading = treat as stale
            }
        }
    }

    /// Check if any of the core cached data is stale
    pub fn any_stale(&self) -> bool {
        let stale_checks = [
            self.is_cache_stale("vocabulary", || self.load_vocabulary()),
            self.is_cache_stale("phrases", || self.load_phrases()),
            self.is_cache_stale("grammar_topics", || self.load_grammar_topics()),
        ];
        stale_checks.iter().any(|&stale| stale)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_phrases() -> Vec<Phrase> {
        vec![Phrase {
            id: 1,
            text: "Takk".to_string(),
            translation: "Thanks".to_string(),
            category: None,
            audio_url: None,
        }]
    }

    #[test]
    fn test_cached_data_age_display_just_now() {
        let cached = CachedData::new(vec![1, 2, 3]);
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_cached_data_is_stale() {
        let fresh = CachedData::new(vec![1]);
        assert!(!fresh.is_stale());

        let mut old = CachedData::new(vec![1]);
        old.cached_at = Utc::now() - Duration::minutes(61);
        assert!(old.is_stale());
        assert_eq!(old.age_display(), "1h ago");
    }

    #[test]
    fn test_cache_roundtrip() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let cache = CacheManager::new(dir.path().to_path_buf()).expect("Failed to create cache");

        assert!(cache
            .load_phrases()
            .expect("Failed to load empty cache")
            .is_none());

        cache
            .save_phrases(&sample_phrases())
            .expect("Failed to save phrases");
        let loaded = cache
            .load_phrases()
            .expect("Failed to load phrases")
            .expect("Phrases missing after save");
        assert_eq!(loaded.data.len(), 1);
        assert_eq!(loaded.data[0].text, "Takk");
        assert!(!loaded.is_stale());
    }

    #[test]
    fn test_any_stale_with_empty_cache() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let cache = CacheManager::new(dir.path().to_path_buf()).expect("Failed to create cache");
        // Nothing cached yet, so everything counts as stale
        assert!(cache.any_stale());
    }
}
