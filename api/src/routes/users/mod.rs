//! User management routes.

pub mod handlers;

pub use super::AppState;

/// Upload size cap for profile pictures (3 MiB)
pub const MAX_UPLOAD_SIZE: usize = 3 * 1024 * 1024;
