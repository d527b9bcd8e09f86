//! In-memory implementation of TokenRepository for testing.
//!
//! Transactions hold the map's mutex for their whole lifetime, so concurrent
//! transactions serialize exactly like row-locked database transactions do:
//! a competing reader or writer waits until commit/rollback. Rollback is an
//! undo log replayed in reverse.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::entities::token::{hash_token, RefreshToken};
use crate::errors::{DomainResult, StoreError};

use super::r#trait::{TokenLookup, TokenRepository};

type TokenMap = HashMap<String, RefreshToken>;

/// Mock token repository keyed by token hash
pub struct MockTokenRepository {
    tokens: Arc<Mutex<TokenMap>>,
    clock: Arc<dyn Clock>,
}

/// Open transaction over the mock store
pub struct MockTx {
    guard: OwnedMutexGuard<TokenMap>,
    // (hash, previous value); None means the key did not exist
    undo: Vec<(String, Option<RefreshToken>)>,
}

impl MockTokenRepository {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a mock whose notion of "now" comes from `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tokens: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    /// Number of stored records (test helper)
    pub async fn len(&self) -> usize {
        self.tokens.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.lock().await.is_empty()
    }

    /// Number of currently valid records for `user_id` (test helper)
    pub async fn active_count_for_user(&self, user_id: Uuid) -> usize {
        let now = self.clock.now();
        self.tokens
            .lock()
            .await
            .values()
            .filter(|t| t.user_id == user_id && t.is_valid_at(now))
            .count()
    }

    fn store_new(
        tokens: &mut TokenMap,
        user_id: Uuid,
        raw_token: &str,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<RefreshToken> {
        let token_hash = hash_token(raw_token);
        if tokens.contains_key(&token_hash) {
            return Err(StoreError::Conflict {
                message: "token hash already exists".to_string(),
            }
            .into());
        }

        let record = RefreshToken::new(user_id, token_hash.clone(), created_at, expires_at);
        tokens.insert(token_hash, record.clone());
        Ok(record)
    }
}

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    type Tx = MockTx;

    async fn begin(&self) -> DomainResult<Self::Tx> {
        let guard = Arc::clone(&self.tokens).lock_owned().await;
        Ok(MockTx {
            guard,
            undo: Vec::new(),
        })
    }

    async fn commit(&self, tx: Self::Tx) -> DomainResult<()> {
        // writes were applied in place; releasing the lock publishes them
        drop(tx);
        Ok(())
    }

    async fn rollback(&self, mut tx: Self::Tx) -> DomainResult<()> {
        while let Some((hash, previous)) = tx.undo.pop() {
            match previous {
                Some(record) => {
                    tx.guard.insert(hash, record);
                }
                None => {
                    tx.guard.remove(&hash);
                }
            }
        }
        Ok(())
    }

    async fn insert(
        &self,
        user_id: Uuid,
        raw_token: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<RefreshToken> {
        let mut tokens = self.tokens.lock().await;
        Self::store_new(&mut tokens, user_id, raw_token, self.clock.now(), expires_at)
    }

    async fn insert_in(
        &self,
        tx: &mut Self::Tx,
        user_id: Uuid,
        raw_token: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<RefreshToken> {
        let record = Self::store_new(
            &mut tx.guard,
            user_id,
            raw_token,
            self.clock.now(),
            expires_at,
        )?;
        tx.undo.push((record.token_hash.clone(), None));
        Ok(record)
    }

    async fn find_by_raw_token(&self, raw_token: &str) -> DomainResult<Option<TokenLookup>> {
        let tokens = self.tokens.lock().await;
        Ok(tokens.get(&hash_token(raw_token)).map(|record| TokenLookup {
            record: record.clone(),
            store_now: self.clock.now(),
        }))
    }

    async fn revoke_in(&self, tx: &mut Self::Tx, id: Uuid) -> DomainResult<bool> {
        let now = self.clock.now();
        let entry = tx.guard.values_mut().find(|t| t.id == id);

        match entry {
            Some(record) if !record.is_revoked() => {
                let previous = record.clone();
                record.revoke_at(now);
                tx.undo.push((previous.token_hash.clone(), Some(previous)));
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_by_raw_token(&self, raw_token: &str) -> DomainResult<bool> {
        let now = self.clock.now();
        let mut tokens = self.tokens.lock().await;

        match tokens.get_mut(&hash_token(raw_token)) {
            Some(record) if !record.is_revoked() => {
                record.revoke_at(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> DomainResult<usize> {
        let now = self.clock.now();
        let mut tokens = self.tokens.lock().await;
        let mut count = 0;

        for record in tokens.values_mut() {
            if record.user_id == user_id && record.revoke_at(now) {
                count += 1;
            }
        }

        Ok(count)
    }

    async fn purge_stale(&self, revocation_grace: Duration) -> DomainResult<usize> {
        let now = self.clock.now();
        let mut tokens = self.tokens.lock().await;
        let initial = tokens.len();

        tokens.retain(|_, record| {
            let expired = record.expires_at < now;
            let revoked_past_grace = record
                .revoked_at
                .map(|at| at < now - revocation_grace)
                .unwrap_or(false);
            !(expired || revoked_past_grace)
        });

        Ok(initial - tokens.len())
    }
}
