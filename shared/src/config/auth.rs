//! Authentication configuration

use serde::{Deserialize, Serialize};

use super::environment::Environment;

/// JWT authentication configuration
///
/// Access and refresh tokens are signed with distinct secrets so that a
/// leaked access-token secret cannot be used to forge refresh tokens.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret for signing access tokens
    pub access_secret: String,

    /// Secret for signing refresh tokens
    pub refresh_secret: String,

    /// JWT issuer claim
    pub issuer: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    /// Production token lifetimes: access 15 minutes, refresh 7 days
    pub const ACCESS_EXPIRY_SECS: i64 = 15 * 60;
    pub const REFRESH_EXPIRY_SECS: i64 = 7 * 24 * 60 * 60;

    /// Relaxed development lifetimes: access 30 days, refresh 90 days
    pub const DEV_ACCESS_EXPIRY_SECS: i64 = 30 * 24 * 60 * 60;
    pub const DEV_REFRESH_EXPIRY_SECS: i64 = 90 * 24 * 60 * 60;

    /// Create a configuration with lifetimes appropriate for `environment`
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
        environment: Environment,
    ) -> Self {
        let (access_token_expiry, refresh_token_expiry) = if environment.is_production() {
            (Self::ACCESS_EXPIRY_SECS, Self::REFRESH_EXPIRY_SECS)
        } else {
            (Self::DEV_ACCESS_EXPIRY_SECS, Self::DEV_REFRESH_EXPIRY_SECS)
        };

        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            issuer: String::from("keygate"),
            access_token_expiry,
            refresh_token_expiry,
        }
    }

    /// Load from environment; `JWT_SECRET` and `JWT_REFRESH_SECRET` are required
    pub fn from_env(environment: Environment) -> Result<Self, String> {
        let access_secret =
            std::env::var("JWT_SECRET").map_err(|_| "JWT_SECRET not set".to_string())?;
        let refresh_secret = std::env::var("JWT_REFRESH_SECRET")
            .map_err(|_| "JWT_REFRESH_SECRET not set".to_string())?;

        if access_secret == refresh_secret {
            return Err("JWT_SECRET and JWT_REFRESH_SECRET must differ".to_string());
        }

        Ok(Self::new(access_secret, refresh_secret, environment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lifetimes() {
        let config = JwtConfig::new("a", "r", Environment::Production);
        assert_eq!(config.access_token_expiry, 15 * 60);
        assert_eq!(config.refresh_token_expiry, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_development_lifetimes_are_relaxed() {
        let config = JwtConfig::new("a", "r", Environment::Development);
        assert!(config.access_token_expiry > JwtConfig::ACCESS_EXPIRY_SECS);
        assert!(config.refresh_token_expiry > JwtConfig::REFRESH_EXPIRY_SECS);
    }
}
