//! # Infrastructure Layer
//!
//! Concrete implementations of the `kg_core` persistence and storage traits:
//! - **Database**: MySQL repositories using SQLx, pool lifecycle, migrations
//! - **Storage**: S3 object storage with presigned download URLs

pub mod database;
pub mod storage;

use thiserror::Error;

/// Errors raised while constructing infrastructure components
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}
