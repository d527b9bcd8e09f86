//! Token issuance, verification, and retention.

pub mod cleanup;
pub mod codec;
pub mod config;

pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use codec::TokenCodec;
pub use config::TokenCodecConfig;
