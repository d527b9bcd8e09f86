//! Account management service.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::entities::user::{User, UserProfile};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::UserRepository;
use crate::services::auth::password;
use crate::services::storage::FileStorage;

/// Content types accepted for uploads, mirroring the public upload filter:
/// images, PDFs, and Word documents.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Configuration for the account service
#[derive(Debug, Clone)]
pub struct AccountServiceConfig {
    /// bcrypt cost factor for password hashing at registration
    pub bcrypt_cost: u32,

    /// Lifetime of presigned profile-picture URLs
    pub signed_url_expiry: Duration,
}

impl Default for AccountServiceConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: 10,
            signed_url_expiry: Duration::from_secs(3600),
        }
    }
}

/// Account details returned to the owner, picture resolved to a signed URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Service for account registration and profile management
pub struct AccountService<U, F>
where
    U: UserRepository,
    F: FileStorage,
{
    user_repository: Arc<U>,
    storage: Arc<F>,
    config: AccountServiceConfig,
    clock: Arc<dyn Clock>,
}

impl<U, F> AccountService<U, F>
where
    U: UserRepository,
    F: FileStorage,
{
    pub fn new(user_repository: Arc<U>, storage: Arc<F>, config: AccountServiceConfig) -> Self {
        Self::with_clock(user_repository, storage, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        user_repository: Arc<U>,
        storage: Arc<F>,
        config: AccountServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repository,
            storage,
            config,
            clock,
        }
    }

    /// Register a new account
    ///
    /// The password is hashed before it leaves this function; duplicate
    /// emails surface as `EmailAlreadyRegistered`.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<UserProfile> {
        let digest = password::hash_password(password, self.config.bcrypt_cost)?;
        let user = User::new(
            name.to_string(),
            email.to_string(),
            digest,
            self.clock.now(),
        );

        let created = self.user_repository.create(user).await?;
        Ok(created.profile())
    }

    /// Fetch a user's public profile
    pub async fn get_user(&self, id: Uuid) -> DomainResult<UserProfile> {
        let user = self
            .user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: "user".to_string(),
            })?;
        Ok(user.profile())
    }

    /// List all public profiles, newest first
    pub async fn list_users(&self) -> DomainResult<Vec<UserProfile>> {
        let users = self.user_repository.list().await?;
        Ok(users.iter().map(User::profile).collect())
    }

    /// The authenticated user's own account view
    ///
    /// A failure to sign the picture URL degrades to no URL rather than
    /// failing the whole request.
    pub async fn me(&self, user_id: Uuid) -> DomainResult<AccountView> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: "user".to_string(),
            })?;

        let profile_picture_url = match &user.profile_picture_key {
            Some(key) => match self
                .storage
                .signed_url(key, self.config.signed_url_expiry)
                .await
            {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(user_id = %user.id, error = %e, "failed to sign profile picture URL");
                    None
                }
            },
            None => None,
        };

        Ok(AccountView {
            id: user.id,
            name: user.name,
            email: user.email,
            profile_picture_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }

    /// Replace a user's profile picture
    ///
    /// Uploads under a fresh key, points the user at it, then deletes the
    /// previous object best-effort; a stale orphan is preferable to a
    /// dangling reference.
    pub async fn update_profile_picture(
        &self,
        user_id: Uuid,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> DomainResult<()> {
        if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
            return Err(DomainError::Validation {
                message: "Invalid file type. Only images, PDFs, and Word documents are allowed."
                    .to_string(),
            });
        }
        if bytes.is_empty() {
            return Err(DomainError::Validation {
                message: "File is required".to_string(),
            });
        }

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: "user".to_string(),
            })?;

        let key = format!("profile-pictures/{}", Uuid::new_v4());
        self.storage.upload(&key, bytes, content_type).await?;
        self.user_repository.set_profile_picture(user_id, &key).await?;

        if let Some(old_key) = user.profile_picture_key {
            if let Err(e) = self.storage.delete(&old_key).await {
                warn!(user_id = %user_id, key = %old_key, error = %e, "failed to delete previous profile picture");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockUserRepository;
    use crate::services::storage::MemoryFileStorage;

    fn config() -> AccountServiceConfig {
        AccountServiceConfig {
            bcrypt_cost: 4,
            ..Default::default()
        }
    }

    fn service() -> AccountService<MockUserRepository, MemoryFileStorage> {
        AccountService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MemoryFileStorage::new()),
            config(),
        )
    }

    #[tokio::test]
    async fn test_register_and_fetch() {
        let service = service();

        let profile = service
            .register("Ada", "ada@example.com", "p1")
            .await
            .unwrap();

        let fetched = service.get_user(profile.id).await.unwrap();
        assert_eq!(fetched, profile);

        let listed = service.list_users().await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let service = service();
        service.register("Ada", "ada@example.com", "p1").await.unwrap();

        let err = service
            .register("Eve", "ada@example.com", "p2")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Auth(crate::errors::AuthError::EmailAlreadyRegistered)
        ));
    }

    #[tokio::test]
    async fn test_profile_picture_upload_and_replacement() {
        let users = Arc::new(MockUserRepository::new());
        let storage = Arc::new(MemoryFileStorage::new());
        let service = AccountService::new(users.clone(), storage.clone(), config());

        let profile = service.register("Ada", "ada@example.com", "p1").await.unwrap();

        service
            .update_profile_picture(profile.id, vec![0xFF, 0xD8], "image/jpeg")
            .await
            .unwrap();
        assert_eq!(storage.len().await, 1);

        let me = service.me(profile.id).await.unwrap();
        let first_url = me.profile_picture_url.unwrap();
        assert!(first_url.starts_with("memory://profile-pictures/"));

        // replacing removes the old object
        service
            .update_profile_picture(profile.id, vec![0x89, 0x50], "image/png")
            .await
            .unwrap();
        assert_eq!(storage.len().await, 1);

        let me = service.me(profile.id).await.unwrap();
        assert_ne!(me.profile_picture_url.unwrap(), first_url);
    }

    #[tokio::test]
    async fn test_profile_picture_rejects_disallowed_type() {
        let service = service();
        let profile = service.register("Ada", "ada@example.com", "p1").await.unwrap();

        let err = service
            .update_profile_picture(profile.id, vec![1, 2, 3], "application/x-sh")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_me_without_picture_has_no_url() {
        let service = service();
        let profile = service.register("Ada", "ada@example.com", "p1").await.unwrap();

        let me = service.me(profile.id).await.unwrap();
        assert!(me.profile_picture_url.is_none());
        assert_eq!(me.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let service = service();
        assert!(matches!(
            service.get_user(Uuid::new_v4()).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
        assert!(matches!(
            service.me(Uuid::new_v4()).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }
}
