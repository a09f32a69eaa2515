use crate::core::errors::UserSphereError;
use crate::core::models::user::{NewUser, User, UserChanges, UserPage, UserQuery};
use async_trait::async_trait;

/// Sole owner of user persistence.
///
/// Email uniqueness (case-insensitive) is enforced by the implementation at
/// write time, never by a separate lookup, so concurrent writers cannot both
/// claim the same address.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Newest first; `search` matches name, email or company as a
    /// case-insensitive substring.
    async fn list_users(&self, query: &UserQuery) -> Result<UserPage, UserSphereError>;
    async fn get_user(&self, user_id: i64) -> Result<Option<User>, UserSphereError>;
    async fn create_user(&self, user: NewUser) -> Result<User, UserSphereError>;
    /// Fails with `UserNotFound` when no row has `user_id`.
    async fn update_user(&self, user_id: i64, changes: UserChanges) -> Result<User, UserSphereError>;
    /// Fails with `UserNotFound` when no row has `user_id`.
    async fn delete_user(&self, user_id: i64) -> Result<(), UserSphereError>;
    async fn count_users(&self) -> Result<u64, UserSphereError>;
    async fn ping(&self) -> Result<(), UserSphereError>;

    async fn close(&self) {}
}

/// Case-insensitive substring test shared by stores that filter in process.
pub fn matches_search(user: &User, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    user.name.to_lowercase().contains(&needle)
        || user.email.to_lowercase().contains(&needle)
        || user
            .company
            .as_deref()
            .is_some_and(|company| company.to_lowercase().contains(&needle))
}

pub mod in_memory;
pub mod postgres;
