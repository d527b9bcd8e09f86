//! Authentication service configuration.

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// bcrypt cost factor for password hashing
    pub bcrypt_cost: u32,

    /// Whether a detected refresh-token reuse revokes every token of the
    /// owner. Recommended on: reuse signals likely token theft.
    pub revoke_all_on_reuse: bool,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: 10,
            revoke_all_on_reuse: true,
        }
    }
}
