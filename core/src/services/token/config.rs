//! Token codec configuration.

use chrono::Duration;
use kg_shared::config::JwtConfig;

use crate::domain::entities::token::JWT_ISSUER;

/// Configuration for the token codec
#[derive(Debug, Clone)]
pub struct TokenCodecConfig {
    /// Secret for signing access tokens
    pub access_secret: String,
    /// Secret for signing refresh tokens; must differ from the access secret
    pub refresh_secret: String,
    /// Issuer claim stamped into and required of every token
    pub issuer: String,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_ttl: Duration,
}

impl TokenCodecConfig {
    /// Production-like lifetimes: access 15 minutes, refresh 7 days
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            issuer: JWT_ISSUER.to_string(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
        }
    }

    /// Relaxed development lifetimes: access 30 days, refresh 90 days
    pub fn relaxed(self) -> Self {
        Self {
            access_ttl: Duration::days(30),
            refresh_ttl: Duration::days(90),
            ..self
        }
    }
}

impl From<&JwtConfig> for TokenCodecConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            access_secret: config.access_secret.clone(),
            refresh_secret: config.refresh_secret.clone(),
            issuer: config.issuer.clone(),
            access_ttl: Duration::seconds(config.access_token_expiry),
            refresh_ttl: Duration::seconds(config.refresh_token_expiry),
        }
    }
}
