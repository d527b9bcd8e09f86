//! Domain-specific error types for authentication and token operations.
//!
//! This is a closed taxonomy: the presentation layer maps each variant to a
//! status code and a stable error code, and nothing outside it leaks to
//! clients.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email and wrong password collapse into the same variant so
    /// responses cannot be used for account enumeration.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailAlreadyRegistered,
}

/// Token-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed, forged, or unknown token
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// An already-rotated or revoked refresh token was presented again.
    /// Distinct from `InvalidToken`: this signals likely token theft and is
    /// never downgraded.
    #[error("Token reuse detected")]
    TokenReuseDetected,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Persistence errors surfaced by the repositories
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// Transient infrastructure failure; the enclosing transaction was
    /// rolled back and the whole operation may be retried.
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    /// A uniqueness constraint rejected the write
    #[error("Store conflict: {message}")]
    Conflict { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_errors_are_indistinguishable() {
        // both failure causes must render identically
        let unknown_email = AuthError::InvalidCredentials;
        let wrong_password = AuthError::InvalidCredentials;

        assert_eq!(unknown_email, wrong_password);
        assert_eq!(unknown_email.to_string(), wrong_password.to_string());
    }

    #[test]
    fn test_reuse_is_distinct_from_invalid() {
        assert_ne!(TokenError::TokenReuseDetected, TokenError::InvalidToken);
    }
}
