//! Token repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainResult;

/// A stored record together with the store's own reading of "now"
///
/// `store_now` is taken from the same statement that fetched the record, so
/// expiry comparisons never mix the application clock with the database
/// clock.
#[derive(Debug, Clone)]
pub struct TokenLookup {
    pub record: RefreshToken,
    pub store_now: DateTime<Utc>,
}

/// Repository trait for refresh token persistence
///
/// The store is the source of truth for refresh token validity. Raw tokens
/// are handed in as-is and hashed inside the implementations; only digests
/// are ever persisted, and `token_hash` is unique across all records.
///
/// Compound operations (the rotation engine's revoke-then-insert) run inside
/// an explicit transaction: `begin` hands out a transaction handle, the
/// `*_in` methods operate within it, and `commit`/`rollback` close it. A
/// dropped handle must behave like a rollback.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Transaction handle type
    type Tx: Send;

    /// Open a new transaction
    async fn begin(&self) -> DomainResult<Self::Tx>;

    /// Commit a transaction, making all its writes visible atomically
    async fn commit(&self, tx: Self::Tx) -> DomainResult<()>;

    /// Abandon a transaction, discarding all its writes
    async fn rollback(&self, tx: Self::Tx) -> DomainResult<()>;

    /// Persist a new refresh token record outside a transaction
    ///
    /// Hashes `raw_token`, stores it with `token_type = refresh` and no
    /// revocation marker. Fails with `StoreError::Conflict` when a record
    /// with the same hash already exists.
    async fn insert(
        &self,
        user_id: Uuid,
        raw_token: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<RefreshToken>;

    /// Persist a new refresh token record inside `tx`
    async fn insert_in(
        &self,
        tx: &mut Self::Tx,
        user_id: Uuid,
        raw_token: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<RefreshToken>;

    /// Look up a record by the raw token's hash
    async fn find_by_raw_token(&self, raw_token: &str) -> DomainResult<Option<TokenLookup>>;

    /// Revoke the record with `id` inside `tx`
    ///
    /// Sets `revoked_at` only where it is currently unset. Returns `false`
    /// when the record is missing or already revoked; deciding whether that
    /// means reuse is the caller's job, so a double revoke never errors.
    async fn revoke_in(&self, tx: &mut Self::Tx, id: Uuid) -> DomainResult<bool>;

    /// Revoke a record by raw token, outside a transaction (logout path)
    ///
    /// Same NULL-guard semantics as `revoke_in`.
    async fn revoke_by_raw_token(&self, raw_token: &str) -> DomainResult<bool>;

    /// Revoke every unrevoked token of `user_id`; returns the count revoked
    async fn revoke_all_for_user(&self, user_id: Uuid) -> DomainResult<usize>;

    /// Delete stale records: expired ones immediately, revoked ones once
    /// `revocation_grace` has passed since revocation. Returns the count
    /// deleted.
    async fn purge_stale(&self, revocation_grace: Duration) -> DomainResult<usize>;
}
