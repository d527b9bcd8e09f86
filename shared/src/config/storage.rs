//! Object storage configuration (profile pictures)

use serde::{Deserialize, Serialize};

/// S3-compatible object storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Bucket holding uploaded files
    pub bucket: String,

    /// AWS region the bucket lives in
    pub region: String,

    /// Lifetime of presigned download URLs in seconds
    pub signed_url_expiry: u64,
}

impl StorageConfig {
    /// Load from environment; `AWS_BUCKET_NAME` is required
    ///
    /// Credentials themselves are resolved by the AWS SDK's default
    /// provider chain, not read here.
    pub fn from_env() -> Result<Self, String> {
        let bucket = std::env::var("AWS_BUCKET_NAME")
            .map_err(|_| "AWS_BUCKET_NAME not set".to_string())?;
        let region = std::env::var("AWS_BUCKET_REGION")
            .or_else(|_| std::env::var("AWS_REGION"))
            .unwrap_or_else(|_| "us-east-1".to_string());
        let signed_url_expiry = std::env::var("STORAGE_SIGNED_URL_EXPIRY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        Ok(Self {
            bucket,
            region,
            signed_url_expiry,
        })
    }
}
