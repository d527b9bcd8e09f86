//! Signed token issuance and verification.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::entities::token::Claims;
use crate::domain::entities::user::UserProfile;
use crate::errors::{DomainError, DomainResult, TokenError};

/// Codec for access and refresh tokens
///
/// Purely functional given the secrets configured at process start: issuance
/// and verification perform no I/O, and the store is never consulted here.
/// Access and refresh tokens are signed with distinct secrets so a leaked
/// access-token secret cannot be used to forge refresh tokens.
pub struct TokenCodec {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Creates a codec using the system clock
    pub fn new(config: super::config::TokenCodecConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a codec with an explicit clock (tests pin time through this)
    pub fn with_clock(config: super::config::TokenCodecConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
            issuer: config.issuer,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            clock,
        }
    }

    /// Issues a signed access token for `profile`
    pub fn issue_access(&self, profile: &UserProfile) -> DomainResult<String> {
        self.issue(profile, &self.access_encoding, self.access_ttl)
    }

    /// Issues a signed refresh token for `profile`
    pub fn issue_refresh(&self, profile: &UserProfile) -> DomainResult<String> {
        self.issue(profile, &self.refresh_encoding, self.refresh_ttl)
    }

    /// Verifies an access token and returns its claims
    pub fn verify_access(&self, token: &str) -> DomainResult<Claims> {
        self.verify(token, &self.access_decoding)
    }

    /// Verifies a refresh token and returns its claims
    pub fn verify_refresh(&self, token: &str) -> DomainResult<Claims> {
        self.verify(token, &self.refresh_decoding)
    }

    /// Access token lifetime
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Refresh token lifetime
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// The codec's reading of the current time
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn issue(
        &self,
        profile: &UserProfile,
        key: &EncodingKey,
        ttl: Duration,
    ) -> DomainResult<String> {
        let now = self.clock.now();
        let claims = Claims::new(profile, now, now + ttl, &self.issuer);

        encode(&Header::new(Algorithm::HS256), &claims, key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    fn verify(&self, token: &str, key: &DecodingKey) -> DomainResult<Claims> {
        let data = decode::<Claims>(token, key, &self.validation).map_err(|e| {
            if e.kind() == &jsonwebtoken::errors::ErrorKind::ExpiredSignature {
                DomainError::Token(TokenError::TokenExpired)
            } else {
                DomainError::Token(TokenError::InvalidToken)
            }
        })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::services::token::config::TokenCodecConfig;
    use uuid::Uuid;

    fn profile() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(TokenCodecConfig::new("access-secret", "refresh-secret"))
    }

    #[test]
    fn test_access_round_trip() {
        let codec = codec();
        let profile = profile();

        let token = codec.issue_access(&profile).unwrap();
        let claims = codec.verify_access(&token).unwrap();

        assert_eq!(claims.profile().unwrap(), profile);
    }

    #[test]
    fn test_refresh_round_trip() {
        let codec = codec();
        let profile = profile();

        let token = codec.issue_refresh(&profile).unwrap();
        let claims = codec.verify_refresh(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), profile.id);
    }

    #[test]
    fn test_distinct_secrets_are_not_interchangeable() {
        let codec = codec();
        let profile = profile();

        let access = codec.issue_access(&profile).unwrap();
        let refresh = codec.issue_refresh(&profile).unwrap();

        // a token signed with one secret must not verify under the other
        assert!(matches!(
            codec.verify_refresh(&access),
            Err(DomainError::Token(TokenError::InvalidToken))
        ));
        assert!(matches!(
            codec.verify_access(&refresh),
            Err(DomainError::Token(TokenError::InvalidToken))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let clock = Arc::new(FixedClock::new(Utc::now() - Duration::days(1)));
        let codec = TokenCodec::with_clock(
            TokenCodecConfig::new("access-secret", "refresh-secret"),
            clock,
        );

        // issued a day in the past, so the 15-minute access token is long gone
        let token = codec.issue_access(&profile()).unwrap();
        assert!(matches!(
            codec.verify_access(&token),
            Err(DomainError::Token(TokenError::TokenExpired))
        ));
    }

    #[test]
    fn test_garbage_is_invalid_not_expired() {
        let codec = codec();

        assert!(matches!(
            codec.verify_access("not-a-jwt"),
            Err(DomainError::Token(TokenError::InvalidToken))
        ));
        assert!(matches!(
            codec.verify_refresh(""),
            Err(DomainError::Token(TokenError::InvalidToken))
        ));
    }

    #[test]
    fn test_wrong_issuer_is_rejected() {
        let profile = profile();
        let mut config = TokenCodecConfig::new("access-secret", "refresh-secret");
        config.issuer = "someone-else".to_string();
        let other = TokenCodec::new(config);

        let token = other.issue_access(&profile).unwrap();
        assert!(matches!(
            codec().verify_access(&token),
            Err(DomainError::Token(TokenError::InvalidToken))
        ));
    }
}
