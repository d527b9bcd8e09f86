//! In-memory implementation of UserRepository for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainResult};

use super::r#trait::UserRepository;

/// Mock user repository
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create(&self, user: User) -> DomainResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailAlreadyRegistered.into());
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn set_profile_picture(&self, id: Uuid, key: &str) -> DomainResult<bool> {
        let mut users = self.users.write().await;

        match users.get_mut(&id) {
            Some(user) => {
                user.profile_picture_key = Some(key.to_string());
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;

    fn user(email: &str) -> User {
        User::new(
            "Ada".to_string(),
            email.to_string(),
            "$2b$10$digest".to_string(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let repo = MockUserRepository::new();
        repo.create(user("ada@example.com")).await.unwrap();

        let result = repo.create(user("ada@example.com")).await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::EmailAlreadyRegistered))
        ));
    }

    #[tokio::test]
    async fn test_find_by_email_and_id() {
        let repo = MockUserRepository::new();
        let created = repo.create(user("ada@example.com")).await.unwrap();

        let by_email = repo.find_by_email("ada@example.com").await.unwrap();
        assert_eq!(by_email.as_ref().map(|u| u.id), Some(created.id));

        let by_id = repo.find_by_id(created.id).await.unwrap();
        assert!(by_id.is_some());
        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_profile_picture() {
        let repo = MockUserRepository::new();
        let created = repo.create(user("ada@example.com")).await.unwrap();

        assert!(repo
            .set_profile_picture(created.id, "profile-pictures/abc")
            .await
            .unwrap());
        assert!(!repo
            .set_profile_picture(Uuid::new_v4(), "profile-pictures/def")
            .await
            .unwrap());

        let stored = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(
            stored.profile_picture_key.as_deref(),
            Some("profile-pictures/abc")
        );
    }
}
