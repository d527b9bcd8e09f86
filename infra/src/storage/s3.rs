//! S3 object storage implementation
//!
//! Implements the core `FileStorage` trait against AWS S3. Downloads are
//! never proxied through the service; clients get short-lived presigned
//! URLs instead. Credentials come from the SDK's default provider chain.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tracing::{debug, info};

use kg_core::errors::{DomainError, DomainResult};
use kg_core::services::storage::FileStorage;
use kg_shared::config::StorageConfig;

/// S3-backed file storage
pub struct S3FileStorage {
    client: S3Client,
    bucket: String,
}

impl S3FileStorage {
    /// Create a new S3 storage client for the configured bucket
    pub async fn new(config: &StorageConfig) -> Self {
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        info!(
            "S3 storage initialized for bucket {} in {}",
            config.bucket, config.region
        );

        Self {
            client: S3Client::new(&aws_config),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl FileStorage for S3FileStorage {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> DomainResult<()> {
        debug!(key = %key, size = bytes.len(), "uploading object");

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| storage_error("Failed to upload object", &e.to_string()))?;

        Ok(())
    }

    async fn signed_url(&self, key: &str, expires_in: Duration) -> DomainResult<String> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| storage_error("Invalid presign expiry", &e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| storage_error("Failed to presign URL", &e.to_string()))?;

        Ok(request.uri().to_string())
    }

    async fn delete(&self, key: &str) -> DomainResult<()> {
        debug!(key = %key, "deleting object");

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| storage_error("Failed to delete object", &e.to_string()))?;

        Ok(())
    }
}

fn storage_error(context: &str, detail: &str) -> DomainError {
    DomainError::Internal {
        message: format!("{}: {}", context, detail),
    }
}
