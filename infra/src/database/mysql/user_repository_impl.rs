//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use kg_core::domain::entities::user::User;
use kg_core::errors::{AuthError, DomainError, DomainResult, StoreError};
use kg_core::repositories::UserRepository;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, profile_picture_key, created_at, updated_at";

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> DomainResult<User> {
        let id: String = row.try_get("id").map_err(|e| decode_error("id", e))?;

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            name: row.try_get("name").map_err(|e| decode_error("name", e))?,
            email: row.try_get("email").map_err(|e| decode_error("email", e))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| decode_error("password_hash", e))?,
            profile_picture_key: row
                .try_get("profile_picture_key")
                .map_err(|e| decode_error("profile_picture_key", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| decode_error("created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| decode_error("updated_at", e))?,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create(&self, user: User) -> DomainResult<User> {
        let query = r#"
            INSERT INTO users (
                id, name, email, password_hash, profile_picture_key, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.profile_picture_key)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AuthError::EmailAlreadyRegistered.into()
                }
                _ => store_error("Failed to create user", e),
            })?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ? LIMIT 1");

        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to find user by email", e))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ? LIMIT 1");

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to find user by id", e))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC");

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("Failed to list users", e))?;

        rows.iter().map(Self::row_to_user).collect()
    }

    async fn set_profile_picture(&self, id: Uuid, key: &str) -> DomainResult<bool> {
        let query = r#"
            UPDATE users
            SET profile_picture_key = ?, updated_at = UTC_TIMESTAMP(6)
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(key)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to update profile picture", e))?;

        Ok(result.rows_affected() > 0)
    }
}

fn store_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::Store(StoreError::Unavailable {
        message: format!("{}: {}", context, e),
    })
}

fn decode_error(column: &str, e: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("Failed to decode column {}: {}", column, e),
    }
}
