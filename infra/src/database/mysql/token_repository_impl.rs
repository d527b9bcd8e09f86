//! MySQL implementation of the TokenRepository trait.
//!
//! Refresh token persistence with SQLx. All timestamps are UTC; the lookup
//! query reads `UTC_TIMESTAMP(6)` in the same statement as the record so
//! expiry decisions never depend on the application clock. Revocation is a
//! conditional update guarded on `revoked_at IS NULL`, which is what makes
//! concurrent rotations of the same token resolve to a single winner.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{MySql, MySqlPool, Row, Transaction};
use uuid::Uuid;

use kg_core::domain::entities::token::{hash_token, RefreshToken, TokenType};
use kg_core::errors::{DomainError, DomainResult, StoreError};
use kg_core::repositories::{TokenLookup, TokenRepository};

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a RefreshToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> DomainResult<RefreshToken> {
        let id: String = row
            .try_get("id")
            .map_err(|e| decode_error("id", e))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| decode_error("user_id", e))?;
        let token_type: String = row
            .try_get("token_type")
            .map_err(|e| decode_error("token_type", e))?;

        Ok(RefreshToken {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid token UUID: {}", e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| decode_error("token_hash", e))?,
            token_type: match token_type.as_str() {
                "refresh" => TokenType::Refresh,
                other => {
                    return Err(DomainError::Internal {
                        message: format!("Unknown token type: {}", other),
                    })
                }
            },
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| decode_error("created_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| decode_error("expires_at", e))?,
            revoked_at: row
                .try_get::<Option<DateTime<Utc>>, _>("revoked_at")
                .map_err(|e| decode_error("revoked_at", e))?,
        })
    }
}

const INSERT_QUERY: &str = r#"
    INSERT INTO refresh_tokens (
        id, user_id, token_hash, token_type, created_at, expires_at
    ) VALUES (?, ?, ?, ?, ?, ?)
"#;

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    type Tx = Transaction<'static, MySql>;

    async fn begin(&self) -> DomainResult<Self::Tx> {
        self.pool
            .begin()
            .await
            .map_err(|e| store_error("Failed to begin transaction", e))
    }

    async fn commit(&self, tx: Self::Tx) -> DomainResult<()> {
        tx.commit()
            .await
            .map_err(|e| store_error("Failed to commit transaction", e))
    }

    async fn rollback(&self, tx: Self::Tx) -> DomainResult<()> {
        tx.rollback()
            .await
            .map_err(|e| store_error("Failed to roll back transaction", e))
    }

    async fn insert(
        &self,
        user_id: Uuid,
        raw_token: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<RefreshToken> {
        let record = RefreshToken::new(user_id, hash_token(raw_token), Utc::now(), expires_at);

        sqlx::query(INSERT_QUERY)
            .bind(record.id.to_string())
            .bind(record.user_id.to_string())
            .bind(&record.token_hash)
            .bind(record.token_type.as_str())
            .bind(record.created_at)
            .bind(record.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("Failed to save refresh token", e))?;

        Ok(record)
    }

    async fn insert_in(
        &self,
        tx: &mut Self::Tx,
        user_id: Uuid,
        raw_token: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<RefreshToken> {
        let record = RefreshToken::new(user_id, hash_token(raw_token), Utc::now(), expires_at);

        sqlx::query(INSERT_QUERY)
            .bind(record.id.to_string())
            .bind(record.user_id.to_string())
            .bind(&record.token_hash)
            .bind(record.token_type.as_str())
            .bind(record.created_at)
            .bind(record.expires_at)
            .execute(&mut **tx)
            .await
            .map_err(|e| write_error("Failed to save refresh token", e))?;

        Ok(record)
    }

    async fn find_by_raw_token(&self, raw_token: &str) -> DomainResult<Option<TokenLookup>> {
        let query = r#"
            SELECT id, user_id, token_hash, token_type, created_at, expires_at, revoked_at,
                   UTC_TIMESTAMP(6) AS store_now
            FROM refresh_tokens
            WHERE token_hash = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(hash_token(raw_token))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to find refresh token", e))?;

        match row {
            Some(row) => {
                let store_now: DateTime<Utc> = row
                    .try_get("store_now")
                    .map_err(|e| decode_error("store_now", e))?;
                Ok(Some(TokenLookup {
                    record: Self::row_to_token(&row)?,
                    store_now,
                }))
            }
            None => Ok(None),
        }
    }

    async fn revoke_in(&self, tx: &mut Self::Tx, id: Uuid) -> DomainResult<bool> {
        let query = r#"
            UPDATE refresh_tokens
            SET revoked_at = UTC_TIMESTAMP(6)
            WHERE id = ? AND revoked_at IS NULL
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(|e| store_error("Failed to revoke token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_by_raw_token(&self, raw_token: &str) -> DomainResult<bool> {
        let query = r#"
            UPDATE refresh_tokens
            SET revoked_at = UTC_TIMESTAMP(6)
            WHERE token_hash = ? AND revoked_at IS NULL
        "#;

        let result = sqlx::query(query)
            .bind(hash_token(raw_token))
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to revoke token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> DomainResult<usize> {
        let query = r#"
            UPDATE refresh_tokens
            SET revoked_at = UTC_TIMESTAMP(6)
            WHERE user_id = ? AND revoked_at IS NULL
        "#;

        let result = sqlx::query(query)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to revoke user tokens", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn purge_stale(&self, revocation_grace: Duration) -> DomainResult<usize> {
        let query = r#"
            DELETE FROM refresh_tokens
            WHERE expires_at < UTC_TIMESTAMP(6)
               OR revoked_at < DATE_SUB(UTC_TIMESTAMP(6), INTERVAL ? DAY)
        "#;

        let result = sqlx::query(query)
            .bind(revocation_grace.num_days())
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to purge stale tokens", e))?;

        Ok(result.rows_affected() as usize)
    }
}

fn store_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::Store(StoreError::Unavailable {
        message: format!("{}: {}", context, e),
    })
}

/// Like `store_error`, but surfaces unique-index violations as conflicts so
/// the rotation engine can distinguish a duplicate hash from an outage.
fn write_error(context: &str, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(ref db) = e {
        if db.is_unique_violation() {
            return DomainError::Store(StoreError::Conflict {
                message: format!("{}: duplicate key", context),
            });
        }
    }
    store_error(context, e)
}

fn decode_error(column: &str, e: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("Failed to decode column {}: {}", column, e),
    }
}
