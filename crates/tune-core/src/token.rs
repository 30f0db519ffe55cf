//! Key-value slot for the access token.
//!
//! The login flow that fills the slot lives elsewhere; the client only reads
//! it before authorized calls. `FileTokenStore` keeps a small JSON map on
//! disk, `MemoryTokenStore` is for tests and one-off runs.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use tracing::{debug, warn};

/// Fixed key of the access-token slot.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

pub trait TokenStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> impl Future<Output = Option<String>> + Send;

    fn set(&self, key: &str, value: &str) -> impl Future<Output = anyhow::Result<()>> + Send;

    fn remove(&self, key: &str) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Convenience: read the access-token slot, treating blank values as absent.
pub async fn access_token<S: TokenStore>(store: &S) -> Option<String> {
    store
        .get(ACCESS_TOKEN_KEY)
        .await
        .filter(|t| !t.trim().is_empty())
}

pub struct FileTokenStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    write_lock: tokio::sync::Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn load(&self) -> HashMap<String, String> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                warn!("Failed to read token file {}: {}", self.path.display(), e);
                return HashMap::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(map) => map,
            Err(e) => {
                warn!("Ignoring malformed token file {}: {}", self.path.display(), e);
                HashMap::new()
            }
        }
    }

    async fn store(&self, map: &HashMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(map)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.load().await.remove(key)
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load().await;
        map.insert(key.to_string(), value.to_string());
        self.store(&map).await?;
        debug!("Stored token slot {:?}", key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load().await;
        if map.remove(key).is_some() {
            self.store(&map).await?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_access_token(token: &str) -> Self {
        let store = Self::new();
        store
            .slots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(ACCESS_TOKEN_KEY.to_string(), token.to_string());
        store
    }
}

impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.slots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.slots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.slots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }
}
