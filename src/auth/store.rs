use std::path::PathBuf;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use async_trait::async_trait;
use keyring::Entry;

use super::{StoredTokens, TokenPair};

/// Token file name for the file-backed store
const TOKEN_FILE: &str = "tokens.json";

/// Keyring service name for the keychain-backed store
const SERVICE_NAME: &str = "lingocache";

/// Keyring entry name holding the serialized token pair
const TOKEN_ENTRY: &str = "tokens";

/// Persistent storage for the access/refresh token pair.
///
/// Both tokens are read and written in a single batched operation so
/// storage never ends up holding only one of the two.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read both tokens in one batched operation.
    async fn load(&self) -> Result<StoredTokens>;

    /// Write both tokens in one batched operation.
    async fn save(&self, tokens: &TokenPair) -> Result<()>;

    /// Remove both tokens.
    async fn clear(&self) -> Result<()>;
}

/// Token store backed by a JSON file in the application data directory.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            path: dir.join(TOKEN_FILE),
        }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<StoredTokens> {
        if !self.path.exists() {
            return Ok(StoredTokens::default());
        }
        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read token file")?;
        let pair: TokenPair = serde_json::from_str(&contents)
            .context("Failed to parse token file")?;
        Ok(pair.into())
    }

    async fn save(&self, tokens: &TokenPair) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(tokens)?;
        // Single write keeps the pair atomic on disk
        std::fs::write(&self.path, contents).context("Failed to write token file")?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove token file")?;
        }
        Ok(())
    }
}

/// Token store backed by the OS keychain.
///
/// The pair is serialized into a single keychain entry so the write
/// stays batched; two separate entries would open a window with only
/// one token updated.
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self
    }

    fn entry() -> Result<Entry> {
        Entry::new(SERVICE_NAME, TOKEN_ENTRY).context("Failed to create keyring entry")
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for KeyringTokenStore {
    async fn load(&self) -> Result<StoredTokens> {
        match Self::entry()?.get_password() {
            Ok(contents) => {
                let pair: TokenPair = serde_json::from_str(&contents)
                    .context("Failed to parse keychain token entry")?;
                Ok(pair.into())
            }
            Err(keyring::Error::NoEntry) => Ok(StoredTokens::default()),
            Err(e) => Err(e).context("Failed to read tokens from keychain"),
        }
    }

    async fn save(&self, tokens: &TokenPair) -> Result<()> {
        let contents = serde_json::to_string(tokens)?;
        Self::entry()?
            .set_password(&contents)
            .context("Failed to store tokens in keychain")?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete tokens from keychain"),
        }
    }
}

/// In-process token store for tests and ephemeral sessions.
pub struct MemoryTokenStore {
    inner: Mutex<StoredTokens>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoredTokens::default()),
        }
    }

    pub fn with_tokens(tokens: StoredTokens) -> Self {
        Self {
            inner: Mutex::new(tokens),
        }
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<StoredTokens> {
        Ok(self.inner.lock().clone())
    }

    async fn save(&self, tokens: &TokenPair) -> Result<()> {
        *self.inner.lock() = tokens.clone().into();
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.inner.lock() = StoredTokens::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> TokenPair {
        TokenPair {
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let store = FileTokenStore::new(dir.path().to_path_buf());

        // Empty store loads as no tokens
        let empty = store.load().await.expect("Failed to load empty store");
        assert!(empty.access_token.is_none());
        assert!(empty.refresh_token.is_none());

        store.save(&pair()).await.expect("Failed to save tokens");
        let loaded = store.load().await.expect("Failed to load tokens");
        assert_eq!(loaded.access_token.as_deref(), Some("access-1"));
        assert_eq!(loaded.refresh_token.as_deref(), Some("refresh-1"));

        store.clear().await.expect("Failed to clear tokens");
        let cleared = store.load().await.expect("Failed to load cleared store");
        assert!(cleared.access_token.is_none());
        assert!(cleared.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_file_store_clear_is_idempotent() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let store = FileTokenStore::new(dir.path().to_path_buf());
        store.clear().await.expect("Clear of empty store failed");
        store.clear().await.expect("Second clear failed");
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        store.save(&pair()).await.expect("Failed to save tokens");
        let loaded = store.load().await.expect("Failed to load tokens");
        assert_eq!(loaded.access_token.as_deref(), Some("access-1"));

        store.clear().await.expect("Failed to clear tokens");
        let cleared = store.load().await.expect("Failed to load cleared store");
        assert!(cleared.refresh_token.is_none());
    }
}
