//! Authentication result returned by login and refresh.

use serde::{Deserialize, Serialize};

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::UserProfile;

/// Public profile plus the freshly issued token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    /// Public profile of the authenticated user
    pub user: UserProfile,

    /// Newly issued access/refresh pair
    pub tokens: TokenPair,
}

impl AuthPayload {
    pub fn new(user: UserProfile, tokens: TokenPair) -> Self {
        Self { user, tokens }
    }
}
