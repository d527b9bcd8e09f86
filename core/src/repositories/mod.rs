//! Repository traits and mock implementations.

pub mod token;
pub mod user;

pub use token::{MockTokenRepository, TokenLookup, TokenRepository};
pub use user::{MockUserRepository, UserRepository};
