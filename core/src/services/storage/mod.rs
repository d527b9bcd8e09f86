//! Object storage seam for profile pictures.
//!
//! The core only ever sees this capability surface; the real S3 client
//! lives in `kg_infra`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::{DomainError, DomainResult};

/// Opaque blob-store capability: upload, presigned download URL, delete
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store `bytes` under `key` with the given content type
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> DomainResult<()>;

    /// Produce a presigned download URL for `key`, valid for `expires_in`
    async fn signed_url(&self, key: &str, expires_in: Duration) -> DomainResult<String>;

    /// Delete the object under `key`
    async fn delete(&self, key: &str) -> DomainResult<()>;
}

/// In-memory storage for tests and local development
pub struct MemoryFileStorage {
    files: Arc<RwLock<HashMap<String, (String, Vec<u8>)>>>,
}

impl MemoryFileStorage {
    pub fn new() -> Self {
        Self {
            files: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored objects (test helper)
    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }

    /// Whether an object exists under `key` (test helper)
    pub async fn contains(&self, key: &str) -> bool {
        self.files.read().await.contains_key(key)
    }
}

impl Default for MemoryFileStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileStorage for MemoryFileStorage {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> DomainResult<()> {
        let mut files = self.files.write().await;
        files.insert(key.to_string(), (content_type.to_string(), bytes));
        Ok(())
    }

    async fn signed_url(&self, key: &str, expires_in: Duration) -> DomainResult<String> {
        let files = self.files.read().await;
        if !files.contains_key(key) {
            return Err(DomainError::NotFound {
                resource: format!("object {}", key),
            });
        }
        Ok(format!("memory://{}?expires={}", key, expires_in.as_secs()))
    }

    async fn delete(&self, key: &str) -> DomainResult<()> {
        let mut files = self.files.write().await;
        files.remove(key);
        Ok(())
    }
}
