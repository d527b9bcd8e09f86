//! Token entities for JWT-based authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::user::UserProfile;

/// JWT issuer claim
pub const JWT_ISSUER: &str = "keygate";

/// Claims structure for the JWT payload
///
/// Both access and refresh tokens carry the same identity claim; they are
/// distinguished by the secret that signed them. No secret material is ever
/// embedded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Display name of the user
    pub name: String,

    /// Email address of the user
    pub email: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates claims for `profile` issued at `issued_at`, expiring at `expires_at`
    pub fn new(
        profile: &UserProfile,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        issuer: &str,
    ) -> Self {
        Self {
            sub: profile.id.to_string(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Rebuilds the public profile embedded in the claims
    pub fn profile(&self) -> Result<UserProfile, uuid::Error> {
        Ok(UserProfile {
            id: self.user_id()?,
            name: self.name.clone(),
            email: self.email.clone(),
        })
    }
}

/// Kind of a stored token record
///
/// Access tokens are stateless and never stored, so `Refresh` is currently
/// the only kind that reaches the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Refresh => "refresh",
        }
    }
}

/// Refresh token record as persisted by the token store
///
/// Only the SHA-256 digest of the raw token is kept; the raw string never
/// touches the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the record
    pub id: Uuid,

    /// User this token belongs to
    pub user_id: Uuid,

    /// SHA-256 hex digest of the raw token; unique across all records
    pub token_hash: String,

    /// Kind of token stored
    pub token_type: TokenType,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Set once when the token is revoked, never cleared
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Creates a new active refresh token record
    pub fn new(
        user_id: Uuid,
        token_hash: String,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            token_type: TokenType::Refresh,
            created_at,
            expires_at,
            revoked_at: None,
        }
    }

    /// Whether the token has been revoked
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Whether the token is expired at `now`; expiry is exclusive, so a
    /// token whose `expires_at` equals `now` is already expired
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether the token is valid at `now` (neither revoked nor expired)
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && !self.is_expired_at(now)
    }

    /// Revokes the token at `now`
    ///
    /// Revocation is monotonic: returns `true` only on the first call, a
    /// later call leaves the original timestamp untouched.
    pub fn revoke_at(&mut self, now: DateTime<Utc>) -> bool {
        if self.revoked_at.is_some() {
            return false;
        }
        self.revoked_at = Some(now);
        true
    }
}

/// Computes the storage digest of a raw refresh token
pub fn hash_token(raw_token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub access_expires_in: i64,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn profile() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_claims_round_trip_profile() {
        let profile = profile();
        let now = Utc::now();
        let claims = Claims::new(&profile, now, now + Duration::minutes(15), JWT_ISSUER);

        assert_eq!(claims.sub, profile.id.to_string());
        assert_eq!(claims.iss, JWT_ISSUER);
        assert_eq!(claims.profile().unwrap(), profile);
    }

    #[test]
    fn test_fresh_token_is_valid() {
        let now = Utc::now();
        let token = RefreshToken::new(
            Uuid::new_v4(),
            "hash".to_string(),
            now,
            now + Duration::days(7),
        );

        assert!(!token.is_revoked());
        assert!(!token.is_expired_at(now));
        assert!(token.is_valid_at(now));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let token = RefreshToken::new(Uuid::new_v4(), "hash".to_string(), now, now);

        // expires_at == now counts as expired
        assert!(token.is_expired_at(now));
        assert!(!token.is_valid_at(now));
        assert!(!token.is_expired_at(now - Duration::seconds(1)));
    }

    #[test]
    fn test_revocation_is_monotonic() {
        let now = Utc::now();
        let mut token = RefreshToken::new(
            Uuid::new_v4(),
            "hash".to_string(),
            now,
            now + Duration::days(7),
        );

        assert!(token.revoke_at(now));
        let first = token.revoked_at;

        // second revoke is a no-op and keeps the original timestamp
        assert!(!token.revoke_at(now + Duration::hours(1)));
        assert_eq!(token.revoked_at, first);
        assert!(!token.is_valid_at(now));
    }

    #[test]
    fn test_hash_token_is_deterministic_and_opaque() {
        let raw = "eyJhbGciOiJIUzI1NiJ9.some.token";
        let hash = hash_token(raw);

        assert_eq!(hash, hash_token(raw));
        assert_ne!(hash, hash_token("different"));
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!hash.contains("eyJ"));
    }

    #[test]
    fn test_token_pair_serialization() {
        let pair = TokenPair::new("access".to_string(), "refresh".to_string(), 900, 604800);

        let json = serde_json::to_string(&pair).unwrap();
        let back: TokenPair = serde_json::from_str(&json).unwrap();

        assert_eq!(pair, back);
    }
}
