//! Configuration module with business-specific sub-modules
//!
//! Configuration is organized into logical areas:
//! - `auth` - JWT signing secrets and token lifetimes
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection
//! - `server` - HTTP server configuration
//! - `storage` - Object storage (profile pictures)

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;
pub mod storage;

pub use auth::JwtConfig;
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use server::ServerConfig;
pub use storage::StorageConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Environment the process runs in
    pub environment: Environment,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Object storage configuration
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load the complete configuration from environment variables
    ///
    /// Fails with a descriptive message when a required variable
    /// (`DATABASE_URL`, the JWT secrets, the storage bucket) is missing.
    pub fn from_env() -> Result<Self, String> {
        let environment = Environment::from_env();
        Ok(Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env(environment)?,
            storage: StorageConfig::from_env()?,
        })
    }
}
