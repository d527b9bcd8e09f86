//! The rotation engine: login, refresh, and logout against the token store.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::UserProfile;
use crate::domain::value_objects::AuthPayload;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::token::TokenCodec;

use super::config::AuthServiceConfig;
use super::password;

/// Authentication service orchestrating the refresh-token lifecycle
///
/// A refresh token moves through derived states: ACTIVE on issue, then
/// ROTATED (replaced by a successor), LOGGED_OUT (revoked without one),
/// EXPIRED (time-based), or REUSED (presented again after revocation).
/// The states are never stored; they fall out of `revoked_at`/`expires_at`.
pub struct AuthService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    user_repository: Arc<U>,
    token_repository: Arc<T>,
    codec: Arc<TokenCodec>,
    config: AuthServiceConfig,
    clock: Arc<dyn Clock>,
}

impl<U, T> AuthService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    pub fn new(
        user_repository: Arc<U>,
        token_repository: Arc<T>,
        codec: Arc<TokenCodec>,
        config: AuthServiceConfig,
    ) -> Self {
        Self::with_clock(
            user_repository,
            token_repository,
            codec,
            config,
            Arc::new(SystemClock),
        )
    }

    pub fn with_clock(
        user_repository: Arc<U>,
        token_repository: Arc<T>,
        codec: Arc<TokenCodec>,
        config: AuthServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repository,
            token_repository,
            codec,
            config,
            clock,
        }
    }

    /// Authenticate with email and password and issue a fresh token pair
    ///
    /// Unknown email and wrong password fail identically with
    /// `InvalidCredentials` so responses cannot be used to enumerate
    /// accounts.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthPayload> {
        let user = match self.user_repository.find_by_email(email).await? {
            Some(user) => user,
            None => return Err(AuthError::InvalidCredentials.into()),
        };

        if !password::verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials.into());
        }

        let profile = user.profile();
        let access_token = self.codec.issue_access(&profile)?;
        let refresh_token = self.codec.issue_refresh(&profile)?;
        let expires_at = self.clock.now() + self.codec.refresh_ttl();

        self.token_repository
            .insert(profile.id, &refresh_token, expires_at)
            .await?;

        info!(user_id = %profile.id, "user logged in");
        Ok(AuthPayload::new(
            profile,
            self.pair(access_token, refresh_token),
        ))
    }

    /// Exchange a refresh token for a fresh pair, rotating the record
    ///
    /// The old record is revoked and the successor inserted inside one store
    /// transaction; every failure after `begin` rolls back, so a partial
    /// rotation is never observable. Presenting an already-revoked token is
    /// reported as `TokenReuseDetected` and never downgraded to
    /// `InvalidToken`.
    pub async fn refresh(&self, raw_refresh_token: &str) -> DomainResult<AuthPayload> {
        self.codec.verify_refresh(raw_refresh_token)?;

        let lookup = self
            .token_repository
            .find_by_raw_token(raw_refresh_token)
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidToken))?;
        let record = lookup.record;

        if record.is_revoked() {
            warn!(
                user_id = %record.user_id,
                token_id = %record.id,
                "revoked refresh token presented again; treating as reuse"
            );
            self.respond_to_reuse(record.user_id).await;
            return Err(TokenError::TokenReuseDetected.into());
        }

        // expiry is judged against the store's own clock, not ours
        if record.is_expired_at(lookup.store_now) {
            return Err(TokenError::TokenExpired.into());
        }

        let user = self
            .user_repository
            .find_by_id(record.user_id)
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidToken))?;
        let profile = user.profile();

        let access_token = self.codec.issue_access(&profile)?;
        let new_refresh_token = self.codec.issue_refresh(&profile)?;
        let expires_at = self.clock.now() + self.codec.refresh_ttl();

        let mut tx = self.token_repository.begin().await?;

        let revoked = match self.token_repository.revoke_in(&mut tx, record.id).await {
            Ok(revoked) => revoked,
            Err(e) => {
                let _ = self.token_repository.rollback(tx).await;
                return Err(e);
            }
        };
        if !revoked {
            // a concurrent rotation consumed this token between our lookup
            // and the revoke; the loser must not mint a second successor
            let _ = self.token_repository.rollback(tx).await;
            warn!(
                user_id = %profile.id,
                token_id = %record.id,
                "lost rotation race; reporting reuse"
            );
            return Err(TokenError::TokenReuseDetected.into());
        }

        if let Err(e) = self
            .token_repository
            .insert_in(&mut tx, profile.id, &new_refresh_token, expires_at)
            .await
        {
            let _ = self.token_repository.rollback(tx).await;
            return Err(e);
        }

        self.token_repository.commit(tx).await?;

        info!(user_id = %profile.id, rotated = %record.id, "refresh token rotated");
        Ok(AuthPayload::new(
            profile,
            self.pair(access_token, new_refresh_token),
        ))
    }

    /// Revoke a single refresh token without issuing a successor
    ///
    /// Fails with `NotFound` when the token is unknown or already revoked;
    /// that makes a second logout of the same token visibly a no-op.
    pub async fn logout(&self, raw_refresh_token: &str) -> DomainResult<()> {
        let revoked = self
            .token_repository
            .revoke_by_raw_token(raw_refresh_token)
            .await?;

        if !revoked {
            return Err(DomainError::NotFound {
                resource: "refresh token".to_string(),
            });
        }

        Ok(())
    }

    /// Best-effort response to a detected reuse: revoke everything the
    /// owner holds. Failure here must not mask the reuse signal itself.
    async fn respond_to_reuse(&self, user_id: uuid::Uuid) {
        if !self.config.revoke_all_on_reuse {
            return;
        }

        match self.token_repository.revoke_all_for_user(user_id).await {
            Ok(count) => {
                warn!(user_id = %user_id, revoked = count, "revoked all tokens after reuse");
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "failed to revoke tokens after reuse");
            }
        }
    }

    fn pair(&self, access_token: String, refresh_token: String) -> TokenPair {
        TokenPair::new(
            access_token,
            refresh_token,
            self.codec.access_ttl().num_seconds(),
            self.codec.refresh_ttl().num_seconds(),
        )
    }

    /// Verify a bearer access token and return the embedded profile
    pub fn verify_access(&self, token: &str) -> DomainResult<UserProfile> {
        let claims = self.codec.verify_access(token)?;
        claims
            .profile()
            .map_err(|_| DomainError::Token(TokenError::InvalidToken))
    }
}
