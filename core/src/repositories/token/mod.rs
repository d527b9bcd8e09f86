//! Refresh token persistence.

mod mock;
mod r#trait;

pub use mock::MockTokenRepository;
pub use r#trait::{TokenLookup, TokenRepository};
