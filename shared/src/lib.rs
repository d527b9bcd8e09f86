//! Shared configuration and common types for the Keygate server
//!
//! This crate provides functionality used across all server crates:
//! - Configuration types loaded from the environment
//! - Common response structures

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DatabaseConfig, Environment, JwtConfig, ServerConfig, StorageConfig,
};
pub use types::response::ErrorResponse;
