//! Route handlers and shared application state.

pub mod auth;
pub mod users;

use std::sync::Arc;

use kg_core::repositories::{TokenRepository, UserRepository};
use kg_core::services::account::AccountService;
use kg_core::services::auth::AuthService;
use kg_core::services::storage::FileStorage;
use kg_core::services::token::TokenCodec;

/// Application state shared by all handlers
///
/// Generic over the repository and storage implementations so the same app
/// runs against MySQL + S3 in production and the in-memory mocks in tests.
pub struct AppState<U, T, F>
where
    U: UserRepository,
    T: TokenRepository,
    F: FileStorage,
{
    pub auth_service: Arc<AuthService<U, T>>,
    pub account_service: Arc<AccountService<U, F>>,
    pub codec: Arc<TokenCodec>,
}
