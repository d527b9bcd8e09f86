//! User repository trait defining the interface for the user directory.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainResult;

/// Repository trait for user persistence
///
/// The user lifecycle is external to the token store; the rotation engine
/// only ever reads through this trait.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user
    ///
    /// Fails with `AuthError::EmailAlreadyRegistered` when the email is
    /// already taken.
    async fn create(&self, user: User) -> DomainResult<User>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Find a user by id
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>>;

    /// List all users, newest first
    async fn list(&self) -> DomainResult<Vec<User>>;

    /// Update the stored profile picture key; returns false when the user
    /// does not exist
    async fn set_profile_picture(&self, id: Uuid, key: &str) -> DomainResult<bool>;
}
